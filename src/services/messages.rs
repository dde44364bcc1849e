use std::sync::Arc;

use super::{broadcaster::Broadcaster, response::ServiceError};
use crate::{
	adapters::repositories::MessageStore,
	domain::message::{CreateMessage, Message, UpdateMessage},
};

/// Message lifecycle: every mutation is committed to the store first and
/// only then announced.
#[derive(Clone)]
pub struct MessageService {
	store: Arc<dyn MessageStore>,
	broadcaster: Broadcaster,
}

impl MessageService {
	pub fn new(
		store: Arc<dyn MessageStore>,
		broadcaster: Broadcaster,
	) -> Self {
		Self { store, broadcaster }
	}

	pub async fn list_messages(&self) -> Result<Vec<Message>, ServiceError> {
		tracing::info!("Retrieving all messages");
		self.store.find_all().await
	}

	pub async fn get_message(
		&self,
		id: i64,
	) -> Result<Message, ServiceError> {
		tracing::info!("Retrieving message with ID: {}", id);
		self.store.find_by_id(id).await?.ok_or(ServiceError::EntityNotFound(id))
	}

	pub async fn create_message(
		&self,
		request: CreateMessage,
	) -> Result<Message, ServiceError> {
		tracing::info!("Creating new message from sender: {}", request.sender_id);
		let message = self.store.insert(request.validate()?).await?;

		let _ = self.broadcaster.message_created(&message).await;
		Ok(message)
	}

	/// Replaces the content when one is given. The read flag is never written
	/// here, so a concurrent `mark_read` cannot be undone by an update.
	pub async fn update_message(
		&self,
		id: i64,
		request: UpdateMessage,
	) -> Result<Message, ServiceError> {
		tracing::info!("Updating message with ID: {}", id);
		request.validate()?;
		let message = match request.content {
			Some(content) => self.store.update_content(id, &content).await?,
			None => self.get_message(id).await?,
		};

		let _ = self.broadcaster.message_updated(&message).await;
		Ok(message)
	}

	/// Marks a message as read. The store flips the flag at most once, and
	/// only the call that flipped it announces the change.
	pub async fn mark_read(
		&self,
		id: i64,
	) -> Result<Message, ServiceError> {
		tracing::info!("Marking message as read with ID: {}", id);
		let Some(message) = self.store.mark_read(id).await? else {
			// Already read, or gone.
			return self.get_message(id).await;
		};

		let _ = self.broadcaster.message_read(&message).await;
		Ok(message)
	}

	pub async fn delete_message(
		&self,
		id: i64,
	) -> Result<(), ServiceError> {
		tracing::info!("Deleting message with ID: {}", id);
		if !self.store.exists_by_id(id).await? {
			return Err(ServiceError::EntityNotFound(id));
		}
		self.store.delete(id).await?;

		let _ = self.broadcaster.message_deleted(id).await;
		Ok(())
	}
}
