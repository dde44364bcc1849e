use std::{collections::HashMap, sync::Arc};

use async_nats::Client;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream::BoxStream, StreamExt};
use tokio::sync::{broadcast, Mutex};

use crate::services::response::ServiceError;

/// Publish half of the realtime transport.
#[async_trait]
pub trait Publish: Send + Sync {
	async fn publish(
		&self,
		subject: String,
		payload: Bytes,
	) -> Result<(), ServiceError>;
}

/// Subscribe half of the realtime transport. Each call yields an independent
/// stream of payloads published on `subject` from then on.
#[async_trait]
pub trait Subscribe: Send + Sync {
	async fn subscribe(
		&self,
		subject: String,
	) -> Result<BoxStream<'static, Bytes>, ServiceError>;
}

/// NATS-backed transport; subjects map one to one onto NATS subjects.
#[derive(Clone)]
pub struct NatsQueue {
	client: Client,
}

impl NatsQueue {
	pub fn new(client: Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl Publish for NatsQueue {
	async fn publish(
		&self,
		subject: String,
		payload: Bytes,
	) -> Result<(), ServiceError> {
		self.client.publish(subject, payload).await.map_err(|err| ServiceError::MessagePublishingError(Box::new(err)))
	}
}

#[async_trait]
impl Subscribe for NatsQueue {
	async fn subscribe(
		&self,
		subject: String,
	) -> Result<BoxStream<'static, Bytes>, ServiceError> {
		let subscriber = self.client.subscribe(subject).await.map_err(|err| {
			tracing::error!("Subscription error on queue service: {:?}", err);
			ServiceError::QueueServiceError
		})?;
		Ok(subscriber.map(|message| message.payload).boxed())
	}
}

/// In-process transport: one broadcast channel per subject, created lazily
/// and dropped again once its last subscriber is gone.
#[derive(Clone)]
pub struct LocalHub {
	rooms: Arc<Mutex<HashMap<String, broadcast::Sender<Bytes>>>>,
	capacity: usize,
}

impl LocalHub {
	pub fn new(capacity: usize) -> Self {
		Self {
			rooms: Default::default(),
			capacity,
		}
	}

	async fn get_or_create_room(
		&self,
		subject: String,
	) -> broadcast::Sender<Bytes> {
		let mut rooms = self.rooms.lock().await;
		rooms.retain(|_, room| room.receiver_count() > 0);
		rooms.entry(subject).or_insert_with(|| broadcast::channel(self.capacity).0).clone()
	}

	#[cfg(test)]
	async fn open_rooms(&self) -> usize {
		self.rooms.lock().await.len()
	}
}

#[async_trait]
impl Publish for LocalHub {
	async fn publish(
		&self,
		subject: String,
		payload: Bytes,
	) -> Result<(), ServiceError> {
		let mut rooms = self.rooms.lock().await;
		if let Some(room) = rooms.get(&subject) {
			// No live receiver is not an error for fire-and-forget delivery.
			if room.send(payload).is_err() {
				rooms.remove(&subject);
			}
		}
		Ok(())
	}
}

#[async_trait]
impl Subscribe for LocalHub {
	async fn subscribe(
		&self,
		subject: String,
	) -> Result<BoxStream<'static, Bytes>, ServiceError> {
		let receiver = self.get_or_create_room(subject.clone()).await.subscribe();
		tracing::debug!(subject = %subject, "Subscribed to local hub");

		let stream = futures::stream::unfold((receiver, subject), |(mut receiver, subject)| async move {
			loop {
				match receiver.recv().await {
					Ok(payload) => return Some((payload, (receiver, subject))),
					Err(broadcast::error::RecvError::Lagged(skipped)) => {
						tracing::warn!(subject = %subject, skipped, "Subscriber lagged behind, dropping notifications");
					}
					Err(broadcast::error::RecvError::Closed) => return None,
				}
			}
		});
		Ok(stream.boxed())
	}
}
