use std::sync::{
	atomic::{AtomicUsize, Ordering},
	Mutex,
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Barrier;

use crate::{
	adapters::{
		queue::Publish,
		repositories::{InMemoryMessageRepository, MessageStore},
	},
	domain::message::{Message, NewMessage},
	services::response::ServiceError,
};

/// Publisher that remembers every publish, or refuses all of them.
#[derive(Default)]
pub struct RecordingQueue {
	published: Mutex<Vec<(String, Bytes)>>,
	attempts: AtomicUsize,
	fail: bool,
}

impl RecordingQueue {
	pub fn failing() -> Self {
		Self {
			fail: true,
			..Default::default()
		}
	}

	pub fn published(&self) -> Vec<(String, Bytes)> {
		self.published.lock().unwrap().clone()
	}

	pub fn subjects(&self) -> Vec<String> {
		self.published().into_iter().map(|(subject, _)| subject).collect()
	}

	pub fn count_on(
		&self,
		subject: &str,
	) -> usize {
		self.published().iter().filter(|(published, _)| published == subject).count()
	}

	pub fn attempts(&self) -> usize {
		self.attempts.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl Publish for RecordingQueue {
	async fn publish(
		&self,
		subject: String,
		payload: Bytes,
	) -> Result<(), ServiceError> {
		self.attempts.fetch_add(1, Ordering::SeqCst);
		if self.fail {
			return Err(ServiceError::MessagePublishingError("broker unavailable".into()));
		}
		self.published.lock().unwrap().push((subject, payload));
		Ok(())
	}
}

/// In-memory store that counts effective writes. Deletes can be made to
/// fail once a number of them has gone through.
#[derive(Default)]
pub struct CountingStore {
	inner: InMemoryMessageRepository,
	writes: AtomicUsize,
	deletes: AtomicUsize,
	delete_limit: Option<usize>,
}

impl CountingStore {
	pub fn failing_deletes_after(limit: usize) -> Self {
		Self {
			delete_limit: Some(limit),
			..Default::default()
		}
	}

	pub fn writes(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl MessageStore for CountingStore {
	async fn find_all(&self) -> Result<Vec<Message>, ServiceError> {
		self.inner.find_all().await
	}

	async fn find_by_id(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError> {
		self.inner.find_by_id(id).await
	}

	async fn find_by_participant(
		&self,
		user_id: &str,
	) -> Result<Vec<Message>, ServiceError> {
		self.inner.find_by_participant(user_id).await
	}

	async fn insert(
		&self,
		message: NewMessage,
	) -> Result<Message, ServiceError> {
		self.writes.fetch_add(1, Ordering::SeqCst);
		self.inner.insert(message).await
	}

	async fn update_content(
		&self,
		id: i64,
		content: &str,
	) -> Result<Message, ServiceError> {
		self.writes.fetch_add(1, Ordering::SeqCst);
		self.inner.update_content(id, content).await
	}

	async fn mark_read(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError> {
		let flipped = self.inner.mark_read(id).await?;
		if flipped.is_some() {
			self.writes.fetch_add(1, Ordering::SeqCst);
		}
		Ok(flipped)
	}

	async fn delete(
		&self,
		id: i64,
	) -> Result<(), ServiceError> {
		if self.delete_limit.is_some_and(|limit| self.deletes.load(Ordering::SeqCst) >= limit) {
			return Err(ServiceError::DatabaseError("connection reset".into()));
		}
		self.deletes.fetch_add(1, Ordering::SeqCst);
		self.writes.fetch_add(1, Ordering::SeqCst);
		self.inner.delete(id).await
	}

	async fn exists_by_id(
		&self,
		id: i64,
	) -> Result<bool, ServiceError> {
		self.inner.exists_by_id(id).await
	}
}

/// Store where other requests on the same row keep getting in the way:
/// a reader marks the row read right before every content update lands,
/// and concurrent `mark_read` calls are held until they all reach the row.
pub struct ContendedStore {
	inner: InMemoryMessageRepository,
	readers: Barrier,
}

impl ContendedStore {
	pub fn new(concurrent_readers: usize) -> Self {
		Self {
			inner: InMemoryMessageRepository::new(),
			readers: Barrier::new(concurrent_readers),
		}
	}
}

#[async_trait]
impl MessageStore for ContendedStore {
	async fn find_all(&self) -> Result<Vec<Message>, ServiceError> {
		self.inner.find_all().await
	}

	async fn find_by_id(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError> {
		self.inner.find_by_id(id).await
	}

	async fn find_by_participant(
		&self,
		user_id: &str,
	) -> Result<Vec<Message>, ServiceError> {
		self.inner.find_by_participant(user_id).await
	}

	async fn insert(
		&self,
		message: NewMessage,
	) -> Result<Message, ServiceError> {
		self.inner.insert(message).await
	}

	async fn update_content(
		&self,
		id: i64,
		content: &str,
	) -> Result<Message, ServiceError> {
		let _ = self.inner.mark_read(id).await?;
		self.inner.update_content(id, content).await
	}

	async fn mark_read(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError> {
		self.readers.wait().await;
		self.inner.mark_read(id).await
	}

	async fn delete(
		&self,
		id: i64,
	) -> Result<(), ServiceError> {
		self.inner.delete(id).await
	}

	async fn exists_by_id(
		&self,
		id: i64,
	) -> Result<bool, ServiceError> {
		self.inner.exists_by_id(id).await
	}
}
