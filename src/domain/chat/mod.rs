pub mod schemas;
use std::{ops::Deref, sync::Arc};

use crate::{
	adapters::queue::Subscribe,
	domain::message::events::{
		user_subject, CONVERSATION_ARCHIVED_SUBJECT, CONVERSATION_DELETED_SUBJECT, MESSAGE_DELETED_SUBJECT, MESSAGE_DELIVERED_SUBJECT,
		MESSAGE_READ_SUBJECT, MESSAGE_UPDATED_SUBJECT, TYPING_SUBJECT,
	},
	services::{broadcaster::Broadcaster, conversations::ConversationService, messages::MessageService},
};

/// Everything a request or a socket session needs, shared across the server.
pub struct ChatState {
	pub messages: MessageService,
	pub conversations: ConversationService,
	pub broadcaster: Broadcaster,
	pub queue: Arc<dyn Subscribe>,
}

impl ChatState {
	/// Subjects a connected user listens on: their own inbox plus the global
	/// lifecycle channels.
	pub fn subjects_for(user_id: &str) -> Vec<String> {
		let mut subjects = vec![user_subject(user_id)];
		subjects.extend(
			[
				MESSAGE_UPDATED_SUBJECT,
				MESSAGE_READ_SUBJECT,
				MESSAGE_DELETED_SUBJECT,
				MESSAGE_DELIVERED_SUBJECT,
				TYPING_SUBJECT,
				CONVERSATION_ARCHIVED_SUBJECT,
				CONVERSATION_DELETED_SUBJECT,
			]
			.map(String::from),
		);
		subjects
	}
}

#[derive(Clone)]
pub struct ChatStateWrapper(pub Arc<ChatState>);
impl From<Arc<ChatState>> for ChatStateWrapper {
	fn from(value: Arc<ChatState>) -> Self {
		Self(value)
	}
}
impl From<ChatState> for ChatStateWrapper {
	fn from(value: ChatState) -> Self {
		Arc::new(value).into()
	}
}
impl Deref for ChatStateWrapper {
	type Target = ChatState;
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[test]
fn test_user_listens_on_own_inbox_but_not_the_firehose() {
	let subjects = ChatState::subjects_for("u2");
	assert_eq!(subjects[0], "topic.user.u2");
	assert!(subjects.contains(&"topic.messages.read".to_string()));
	assert!(!subjects.contains(&"topic.messages".to_string()));
	assert!(!subjects.contains(&"topic.user.u3".to_string()));
}
