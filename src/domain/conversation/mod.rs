//! Conversations are never stored. They are recomputed from the flat list of
//! direct messages every time somebody asks for them.
pub mod key;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use self::key::ConversationKey;
use crate::domain::message::Message;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
	pub conversation_id: String,
	/// Sender of the first message, i.e. whoever started the conversation.
	pub sender_id: String,
	pub receiver_id: String,
	pub item_id: Option<i64>,
	pub last_message: String,
	pub last_message_time: DateTime<Utc>,
	/// Archival is only ever announced live, so a fresh read is never archived.
	pub archived: bool,
	pub messages: Vec<Message>,
}

impl ConversationSummary {
	/// `messages` must be non-empty and already in conversation order.
	fn from_ordered(key: &ConversationKey, messages: Vec<Message>) -> Option<Self> {
		let (sender_id, receiver_id, item_id) = {
			let first = messages.first()?;
			(first.sender_id.clone(), first.receiver_id.clone(), first.item_id)
		};
		let (last_message, last_message_time) = {
			let last = messages.last()?;
			(last.content.clone(), last.created_at)
		};

		Some(Self {
			conversation_id: key.to_string(),
			sender_id,
			receiver_id,
			item_id,
			last_message,
			last_message_time,
			archived: false,
			messages,
		})
	}
}

/// Groups `messages` into buckets and returns them newest conversation first.
pub fn aggregate(messages: Vec<Message>) -> Vec<ConversationSummary> {
	let mut buckets: BTreeMap<ConversationKey, Vec<Message>> = BTreeMap::new();
	for message in messages {
		buckets.entry(ConversationKey::of(&message)).or_default().push(message);
	}

	let mut conversations: Vec<ConversationSummary> = buckets
		.into_iter()
		.filter_map(|(key, mut bucket)| {
			bucket.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
			ConversationSummary::from_ordered(&key, bucket)
		})
		.collect();

	// BTreeMap iteration already orders equal timestamps by conversation id.
	conversations.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
	conversations
}

/// Messages of `messages` that fall in the conversation identified by `conversation_id`.
pub fn messages_in(
	conversation_id: &str,
	messages: Vec<Message>,
) -> Vec<Message> {
	messages.into_iter().filter(|message| ConversationKey::of(message).to_string() == conversation_id).collect()
}
