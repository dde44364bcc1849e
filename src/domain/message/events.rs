use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::entity::Message;

pub const MESSAGES_SUBJECT: &str = "topic.messages";
pub const MESSAGE_UPDATED_SUBJECT: &str = "topic.messages.update";
pub const MESSAGE_READ_SUBJECT: &str = "topic.messages.read";
pub const MESSAGE_DELETED_SUBJECT: &str = "topic.messages.delete";
pub const MESSAGE_DELIVERED_SUBJECT: &str = "topic.messages.delivered";
pub const TYPING_SUBJECT: &str = "topic.messages.typing";
pub const CONVERSATION_ARCHIVED_SUBJECT: &str = "topic.conversations.archive";
pub const CONVERSATION_DELETED_SUBJECT: &str = "topic.conversations.delete";
const USER_SUBJECT_PREFIX: &str = "topic.user.";

/// Channel a client subscribes to when it only knows its own id.
pub fn user_subject(user_id: &str) -> String {
	format!("{USER_SUBJECT_PREFIX}{user_id}")
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedConversation {
	pub conversation_id: String,
	pub user_id: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
	pub message_id: i64,
	pub user_id: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingStatus {
	pub user_id: String,
	pub receiver_id: String,
	pub is_typing: bool,
}

/// Lifecycle transitions pushed to realtime subscribers.
#[derive(Debug)]
pub enum MessageEvent<'a> {
	Created(&'a Message),
	Updated(&'a Message),
	Read(&'a Message),
	Deleted(i64),
	ConversationArchived(&'a ArchivedConversation),
	ConversationDeleted(&'a str),
	Delivered(&'a DeliveryReceipt),
	Typing(&'a TypingStatus),
}

impl<'a> MessageEvent<'a> {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Created(_) => "message_created",
			Self::Updated(_) => "message_updated",
			Self::Read(_) => "message_read",
			Self::Deleted(_) => "message_deleted",
			Self::ConversationArchived(_) => "conversation_archived",
			Self::ConversationDeleted(_) => "conversation_deleted",
			Self::Delivered(_) => "message_delivered",
			Self::Typing(_) => "typing",
		}
	}

	pub fn subjects(&self) -> Vec<String> {
		match self {
			Self::Created(message) => vec![MESSAGES_SUBJECT.to_string(), user_subject(&message.receiver_id)],
			Self::Updated(_) => vec![MESSAGE_UPDATED_SUBJECT.to_string()],
			Self::Read(_) => vec![MESSAGE_READ_SUBJECT.to_string()],
			Self::Deleted(_) => vec![MESSAGE_DELETED_SUBJECT.to_string()],
			Self::ConversationArchived(_) => vec![CONVERSATION_ARCHIVED_SUBJECT.to_string()],
			Self::ConversationDeleted(_) => vec![CONVERSATION_DELETED_SUBJECT.to_string()],
			Self::Delivered(_) => vec![MESSAGE_DELIVERED_SUBJECT.to_string()],
			Self::Typing(_) => vec![TYPING_SUBJECT.to_string()],
		}
	}

	pub fn payload(&self) -> Result<Bytes, serde_json::Error> {
		let raw = match self {
			Self::Created(message) | Self::Updated(message) | Self::Read(message) => serde_json::to_vec(message)?,
			Self::Deleted(id) => serde_json::to_vec(id)?,
			Self::ConversationArchived(archived) => serde_json::to_vec(archived)?,
			Self::ConversationDeleted(conversation_id) => serde_json::to_vec(conversation_id)?,
			Self::Delivered(receipt) => serde_json::to_vec(receipt)?,
			Self::Typing(status) => serde_json::to_vec(status)?,
		};
		Ok(raw.into())
	}
}
