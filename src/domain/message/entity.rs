use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A direct message between exactly two participants.
///
/// Everything except `content` (through an explicit update) and `is_read`
/// is fixed once the row exists. `is_read` only ever moves from `false` to `true`.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
	pub id: i64,
	pub sender_id: String,
	pub receiver_id: String,
	pub item_id: Option<i64>,
	pub content: String,
	pub is_read: bool,
	pub created_at: DateTime<Utc>,
}

impl Message {
	pub fn involves(&self, user_id: &str) -> bool {
		self.sender_id == user_id || self.receiver_id == user_id
	}

	/// The participant on the other side of the message, seen from `user_id`.
	pub fn counterpart_of(&self, user_id: &str) -> &str {
		if self.sender_id == user_id {
			&self.receiver_id
		} else {
			&self.sender_id
		}
	}
}

/// A validated message that has not been given an id by the store yet.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NewMessage {
	pub sender_id: String,
	pub receiver_id: String,
	pub item_id: Option<i64>,
	pub content: String,
	pub created_at: DateTime<Utc>,
}

impl NewMessage {
	pub(crate) fn into_message(self, id: i64) -> Message {
		Message {
			id,
			sender_id: self.sender_id,
			receiver_id: self.receiver_id,
			item_id: self.item_id,
			content: self.content,
			is_read: false,
			created_at: self.created_at,
		}
	}
}

#[test]
fn test_counterpart_is_seen_from_either_side() {
	let message = NewMessage {
		sender_id: "u1".into(),
		receiver_id: "u2".into(),
		item_id: None,
		content: "hi".into(),
		created_at: Utc::now(),
	}
	.into_message(1);

	assert!(message.involves("u1"));
	assert!(message.involves("u2"));
	assert!(!message.involves("u3"));
	assert_eq!(message.counterpart_of("u1"), "u2");
	assert_eq!(message.counterpart_of("u2"), "u1");
	assert!(!message.is_read);
}

#[test]
fn test_wire_shape_uses_camel_case() {
	let message = NewMessage {
		sender_id: "u1".into(),
		receiver_id: "u2".into(),
		item_id: Some(7),
		content: "hi".into(),
		created_at: Utc::now(),
	}
	.into_message(3);

	let value = serde_json::to_value(&message).unwrap();
	assert_eq!(value["senderId"], "u1");
	assert_eq!(value["receiverId"], "u2");
	assert_eq!(value["itemId"], 7);
	assert_eq!(value["isRead"], false);
	assert!(value.get("createdAt").is_some());
}
