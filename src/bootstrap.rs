use std::sync::Arc;

use crate::{
	adapters::{
		queue::{LocalHub, NatsQueue, Publish, Subscribe},
		repositories::{InMemoryMessageRepository, MessageRepository, MessageStore},
	},
	config::Config,
	database::{connection_pool, run_migrations},
	dependencies::queue_client,
	domain::chat::{ChatState, ChatStateWrapper},
	services::{broadcaster::Broadcaster, conversations::ConversationService, messages::MessageService, response::ServiceError},
};

pub struct Bootstrap;
impl Bootstrap {
	/// Wires the services against whatever backing services `config` names,
	/// falling back to in-process ones.
	pub async fn chat_state(config: &Config) -> Result<ChatStateWrapper, ServiceError> {
		let store: Arc<dyn MessageStore> = match &config.database_url {
			Some(url) => {
				let pool = connection_pool(url, config.max_db_connections).await?;
				run_migrations(pool).await?;
				Arc::new(MessageRepository::new(pool.clone()))
			}
			None => {
				tracing::warn!("DATABASE_URL is not set, messages are kept in memory");
				Arc::new(InMemoryMessageRepository::new())
			}
		};

		let state = match &config.queue_url {
			Some(url) => Self::assemble(store, Arc::new(NatsQueue::new(queue_client(url).await?.clone()))),
			None => {
				tracing::warn!("QUEUE_URL is not set, notifications stay inside this process");
				Self::assemble(store, Arc::new(LocalHub::new(config.channel_capacity)))
			}
		};
		Ok(state)
	}

	pub fn assemble<Q: Publish + Subscribe + 'static>(
		store: Arc<dyn MessageStore>,
		queue: Arc<Q>,
	) -> ChatStateWrapper {
		let broadcaster = Broadcaster::new(queue.clone());
		ChatState {
			messages: MessageService::new(store.clone(), broadcaster.clone()),
			conversations: ConversationService::new(store, broadcaster.clone()),
			broadcaster,
			queue,
		}
		.into()
	}
}
