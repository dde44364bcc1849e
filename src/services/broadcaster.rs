use std::sync::Arc;

use crate::{
	adapters::queue::Publish,
	domain::message::{
		events::{ArchivedConversation, DeliveryReceipt, TypingStatus},
		Message, MessageEvent,
	},
};

/// Outcome of a best-effort notification.
///
/// Failures are already logged by the time this is returned; callers only
/// get to acknowledge that delivery may have been dropped.
#[must_use = "discard the delivery outcome explicitly with `let _ =`"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
	Published,
	Dropped,
}

/// Fire-and-forget notifier for message and conversation lifecycle events.
#[derive(Clone)]
pub struct Broadcaster {
	queue: Arc<dyn Publish>,
}

impl Broadcaster {
	pub fn new(queue: Arc<dyn Publish>) -> Self {
		Self { queue }
	}

	pub async fn message_created(
		&self,
		message: &Message,
	) -> Delivery {
		tracing::info!("Broadcasting new message with ID: {}", message.id);
		self.dispatch(MessageEvent::Created(message)).await
	}

	pub async fn message_updated(
		&self,
		message: &Message,
	) -> Delivery {
		tracing::info!("Broadcasting message update with ID: {}", message.id);
		self.dispatch(MessageEvent::Updated(message)).await
	}

	pub async fn message_read(
		&self,
		message: &Message,
	) -> Delivery {
		tracing::info!("Broadcasting message marked as read with ID: {}", message.id);
		self.dispatch(MessageEvent::Read(message)).await
	}

	pub async fn message_deleted(
		&self,
		message_id: i64,
	) -> Delivery {
		tracing::info!("Broadcasting message deletion with ID: {}", message_id);
		self.dispatch(MessageEvent::Deleted(message_id)).await
	}

	pub async fn conversation_archived(
		&self,
		conversation_id: &str,
		user_id: &str,
	) -> Delivery {
		tracing::info!("Broadcasting conversation archive: {}", conversation_id);
		let archived = ArchivedConversation {
			conversation_id: conversation_id.to_string(),
			user_id: user_id.to_string(),
		};
		self.dispatch(MessageEvent::ConversationArchived(&archived)).await
	}

	pub async fn conversation_deleted(
		&self,
		conversation_id: &str,
	) -> Delivery {
		tracing::info!("Broadcasting conversation deletion: {}", conversation_id);
		self.dispatch(MessageEvent::ConversationDeleted(conversation_id)).await
	}

	pub async fn delivery_confirmed(
		&self,
		receipt: &DeliveryReceipt,
	) -> Delivery {
		tracing::info!("Message delivery confirmed: {}", receipt.message_id);
		self.dispatch(MessageEvent::Delivered(receipt)).await
	}

	pub async fn typing(
		&self,
		status: &TypingStatus,
	) -> Delivery {
		tracing::debug!("User {} typing status (to {}): {}", status.user_id, status.receiver_id, status.is_typing);
		self.dispatch(MessageEvent::Typing(status)).await
	}

	async fn dispatch(
		&self,
		event: MessageEvent<'_>,
	) -> Delivery {
		let payload = match event.payload() {
			Ok(payload) => payload,
			Err(err) => {
				tracing::error!(event = event.name(), "Error serializing notification: {}", err);
				return Delivery::Dropped;
			}
		};

		// Each subject is attempted on its own.
		let mut delivery = Delivery::Published;
		for subject in event.subjects() {
			if let Err(err) = self.queue.publish(subject.clone(), payload.clone()).await {
				tracing::error!(event = event.name(), subject = %subject, "Error broadcasting notification: {}", err);
				delivery = Delivery::Dropped;
			}
		}
		delivery
	}
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use chrono::Utc;

	use super::{Broadcaster, Delivery};
	use crate::{
		domain::message::{events::TypingStatus, Message},
		services::test_doubles::RecordingQueue,
	};

	fn message() -> Message {
		Message {
			id: 42,
			sender_id: "u1".into(),
			receiver_id: "u2".into(),
			item_id: Some(7),
			content: "is it still for sale?".into(),
			is_read: false,
			created_at: Utc::now(),
		}
	}

	#[tokio::test]
	async fn test_created_reaches_global_and_receiver_channel() {
		let queue = Arc::new(RecordingQueue::default());
		let broadcaster = Broadcaster::new(queue.clone());

		let message = message();

		assert_eq!(broadcaster.message_created(&message).await, Delivery::Published);

		assert_eq!(queue.subjects(), vec!["topic.messages".to_string(), "topic.user.u2".to_string()]);
		let sent: Message = serde_json::from_slice(&queue.published()[1].1).unwrap();
		assert_eq!(sent, message);
	}

	#[tokio::test]
	async fn test_deleted_publishes_only_the_id() {
		let queue = Arc::new(RecordingQueue::default());
		let broadcaster = Broadcaster::new(queue.clone());

		let _ = broadcaster.message_deleted(42).await;

		let published = queue.published();
		assert_eq!(published.len(), 1);
		assert_eq!(published[0].0, "topic.messages.delete");
		assert_eq!(&published[0].1[..], b"42");
	}

	#[tokio::test]
	async fn test_each_event_has_its_own_channel() {
		let queue = Arc::new(RecordingQueue::default());
		let broadcaster = Broadcaster::new(queue.clone());
		let message = message();

		let _ = broadcaster.message_updated(&message).await;
		let _ = broadcaster.message_read(&message).await;
		let _ = broadcaster.conversation_archived("u1_u2_7", "u1").await;
		let _ = broadcaster.conversation_deleted("u1_u2_7").await;
		let _ = broadcaster
			.typing(&TypingStatus {
				user_id: "u1".into(),
				receiver_id: "u2".into(),
				is_typing: true,
			})
			.await;

		assert_eq!(
			queue.subjects(),
			vec![
				"topic.messages.update".to_string(),
				"topic.messages.read".to_string(),
				"topic.conversations.archive".to_string(),
				"topic.conversations.delete".to_string(),
				"topic.messages.typing".to_string(),
			]
		);
	}

	#[tokio::test]
	async fn test_publish_failure_is_absorbed() {
		let queue = Arc::new(RecordingQueue::failing());
		let broadcaster = Broadcaster::new(queue.clone());

		assert_eq!(broadcaster.message_created(&message()).await, Delivery::Dropped);
		// Both subjects were still attempted.
		assert_eq!(queue.attempts(), 2);
	}
}
