use std::fmt::Display;

use crate::domain::message::Message;

/// Token standing in for "no item" inside a conversation id.
pub const NO_ITEM: &str = "null";

/// Canonical bucket key: the participant pair in sorted order plus the item.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct ConversationKey {
	low: String,
	high: String,
	item_id: Option<i64>,
}

impl ConversationKey {
	pub fn new(
		a: &str,
		b: &str,
		item_id: Option<i64>,
	) -> Self {
		let (low, high) = if a <= b { (a, b) } else { (b, a) };
		Self {
			low: low.to_string(),
			high: high.to_string(),
			item_id,
		}
	}

	pub fn of(message: &Message) -> Self {
		Self::new(&message.sender_id, &message.receiver_id, message.item_id)
	}
}

impl Display for ConversationKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.item_id {
			Some(item_id) => write!(f, "{}_{}_{}", self.low, self.high, item_id),
			None => write!(f, "{}_{}_{}", self.low, self.high, NO_ITEM),
		}
	}
}

#[test]
fn test_key_is_symmetric_in_participants() {
	for item in [None, Some(7)] {
		assert_eq!(ConversationKey::new("alice", "bob", item), ConversationKey::new("bob", "alice", item));
		assert_eq!(
			ConversationKey::new("alice", "bob", item).to_string(),
			ConversationKey::new("bob", "alice", item).to_string()
		);
	}
}

#[test]
fn test_item_is_part_of_the_key() {
	assert_ne!(ConversationKey::new("a", "b", None), ConversationKey::new("a", "b", Some(1)));
	assert_ne!(ConversationKey::new("a", "b", Some(1)), ConversationKey::new("a", "b", Some(2)));
	assert_eq!(ConversationKey::new("b", "a", None).to_string(), "a_b_null");
	assert_eq!(ConversationKey::new("b", "a", Some(12)).to_string(), "a_b_12");
}
