use std::{collections::BTreeSet, sync::Arc};

use chrono::Utc;

use super::{broadcaster::Broadcaster, response::ServiceError};
use crate::{
	adapters::repositories::MessageStore,
	domain::{
		conversation::{self, ConversationSummary},
		message::NewMessage,
	},
};

pub const SYSTEM_SENDER: &str = "system";
pub const ACCOUNT_DELETED_NOTICE: &str = "This user has deleted their account.";

#[derive(Clone)]
pub struct ConversationService {
	store: Arc<dyn MessageStore>,
	broadcaster: Broadcaster,
}

impl ConversationService {
	pub fn new(
		store: Arc<dyn MessageStore>,
		broadcaster: Broadcaster,
	) -> Self {
		Self { store, broadcaster }
	}

	/// Conversations the user takes part in, newest first. Recomputed on every call.
	pub async fn list_conversations(
		&self,
		user_id: &str,
	) -> Result<Vec<ConversationSummary>, ServiceError> {
		tracing::info!("Retrieving conversations for user: {}", user_id);
		let messages = self.store.find_by_participant(user_id).await?;
		Ok(conversation::aggregate(messages))
	}

	/// Announces that `user_id` archived the conversation. Nothing is stored,
	/// so the next `list_conversations` still reports it as not archived.
	pub async fn archive_conversation(
		&self,
		conversation_id: &str,
		user_id: &str,
	) -> Result<(), ServiceError> {
		tracing::info!("Archiving conversation: {} for user: {}", conversation_id, user_id);
		let _ = self.broadcaster.conversation_archived(conversation_id, user_id).await;
		Ok(())
	}

	/// Deletes every message of the conversation and returns how many went.
	pub async fn delete_conversation(
		&self,
		conversation_id: &str,
		user_id: &str,
	) -> Result<usize, ServiceError> {
		tracing::info!("Deleting conversation: {} for user: {}", conversation_id, user_id);
		let messages = conversation::messages_in(conversation_id, self.store.find_by_participant(user_id).await?);
		if messages.is_empty() {
			return Err(ServiceError::ConversationNotFound(conversation_id.to_string()));
		}

		for (removed, message) in messages.iter().enumerate() {
			if let Err(err) = self.store.delete(message.id).await {
				tracing::error!(
					"Deleting conversation {} stopped after {} of {} messages: {}",
					conversation_id,
					removed,
					messages.len(),
					err
				);
				return Err(err);
			}
			let _ = self.broadcaster.message_deleted(message.id).await;
		}

		let _ = self.broadcaster.conversation_deleted(conversation_id).await;
		Ok(messages.len())
	}

	/// Leaves a system notice in each of the user's conversations telling the
	/// other participant that the account is gone. Returns the number of notices.
	pub async fn notify_account_deleted(
		&self,
		user_id: &str,
	) -> Result<usize, ServiceError> {
		tracing::info!("Marking user as deleted in conversations: {}", user_id);
		let conversations = self.list_conversations(user_id).await?;
		if conversations.is_empty() {
			tracing::info!("No messages found for user {}", user_id);
			return Ok(0);
		}

		// One notice per (counterpart, item) even if the same pair shows up twice.
		let recipients: BTreeSet<(String, Option<i64>)> = conversations
			.iter()
			.filter_map(|conversation| conversation.messages.first())
			.map(|first| (first.counterpart_of(user_id).to_string(), first.item_id))
			.collect();

		for (receiver_id, item_id) in &recipients {
			let notice = self
				.store
				.insert(NewMessage {
					sender_id: SYSTEM_SENDER.to_string(),
					receiver_id: receiver_id.clone(),
					item_id: *item_id,
					content: ACCOUNT_DELETED_NOTICE.to_string(),
					created_at: Utc::now(),
				})
				.await?;
			let _ = self.broadcaster.message_created(&notice).await;
		}

		tracing::info!("Successfully marked user as deleted in conversations: {}", user_id);
		Ok(recipients.len())
	}
}
