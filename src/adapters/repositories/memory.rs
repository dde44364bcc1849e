use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::MessageStore;
use crate::{
	domain::message::{Message, NewMessage},
	services::response::ServiceError,
};

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct InMemoryMessageRepository {
	inner: RwLock<Table>,
}

#[derive(Default)]
struct Table {
	last_id: i64,
	rows: BTreeMap<i64, Message>,
}

impl InMemoryMessageRepository {
	pub fn new() -> Self {
		Self::default()
	}
}

fn in_creation_order(mut messages: Vec<Message>) -> Vec<Message> {
	messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
	messages
}

#[async_trait]
impl MessageStore for InMemoryMessageRepository {
	async fn find_all(&self) -> Result<Vec<Message>, ServiceError> {
		let table = self.inner.read().await;
		Ok(in_creation_order(table.rows.values().cloned().collect()))
	}

	async fn find_by_id(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError> {
		Ok(self.inner.read().await.rows.get(&id).cloned())
	}

	async fn find_by_participant(
		&self,
		user_id: &str,
	) -> Result<Vec<Message>, ServiceError> {
		let table = self.inner.read().await;
		Ok(in_creation_order(table.rows.values().filter(|message| message.involves(user_id)).cloned().collect()))
	}

	async fn insert(
		&self,
		message: NewMessage,
	) -> Result<Message, ServiceError> {
		let mut table = self.inner.write().await;
		table.last_id += 1;
		let message = message.into_message(table.last_id);
		table.rows.insert(message.id, message.clone());
		Ok(message)
	}

	async fn update_content(
		&self,
		id: i64,
		content: &str,
	) -> Result<Message, ServiceError> {
		let mut table = self.inner.write().await;
		let row = table.rows.get_mut(&id).ok_or(ServiceError::EntityNotFound(id))?;
		row.content = content.to_string();
		Ok(row.clone())
	}

	async fn mark_read(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError> {
		let mut table = self.inner.write().await;
		match table.rows.get_mut(&id) {
			Some(row) if !row.is_read => {
				row.is_read = true;
				Ok(Some(row.clone()))
			}
			_ => Ok(None),
		}
	}

	async fn delete(
		&self,
		id: i64,
	) -> Result<(), ServiceError> {
		self.inner.write().await.rows.remove(&id);
		Ok(())
	}

	async fn exists_by_id(
		&self,
		id: i64,
	) -> Result<bool, ServiceError> {
		Ok(self.inner.read().await.rows.contains_key(&id))
	}
}

#[cfg(test)]
mod test {
	use chrono::Utc;

	use super::*;

	fn new_message(
		sender: &str,
		receiver: &str,
	) -> NewMessage {
		NewMessage {
			sender_id: sender.into(),
			receiver_id: receiver.into(),
			item_id: None,
			content: "hi".into(),
			created_at: Utc::now(),
		}
	}

	#[tokio::test]
	async fn test_insert_assigns_increasing_ids() {
		let store = InMemoryMessageRepository::new();
		let first = store.insert(new_message("u1", "u2")).await.unwrap();
		let second = store.insert(new_message("u2", "u1")).await.unwrap();
		assert!(second.id > first.id);
		assert!(!first.is_read);
		assert!(store.exists_by_id(first.id).await.unwrap());
	}

	#[tokio::test]
	async fn test_find_by_participant_matches_both_directions() {
		let store = InMemoryMessageRepository::new();
		store.insert(new_message("u1", "u2")).await.unwrap();
		store.insert(new_message("u3", "u1")).await.unwrap();
		store.insert(new_message("u2", "u3")).await.unwrap();

		assert_eq!(store.find_by_participant("u1").await.unwrap().len(), 2);
		assert_eq!(store.find_by_participant("u4").await.unwrap().len(), 0);
	}

	#[tokio::test]
	async fn test_update_content_keeps_read_flag_and_creation_time() {
		let store = InMemoryMessageRepository::new();
		let message = store.insert(new_message("u1", "u2")).await.unwrap();
		store.mark_read(message.id).await.unwrap();

		let updated = store.update_content(message.id, "edited").await.unwrap();

		assert!(updated.is_read);
		assert_eq!(updated.content, "edited");
		assert_eq!(updated.sender_id, "u1");
		assert_eq!(updated.created_at, message.created_at);
	}

	#[tokio::test]
	async fn test_update_content_of_missing_row_is_not_found() {
		let store = InMemoryMessageRepository::new();
		assert!(matches!(store.update_content(99, "edited").await, Err(ServiceError::EntityNotFound(99))));
	}

	#[tokio::test]
	async fn test_mark_read_flips_only_once() {
		let store = InMemoryMessageRepository::new();
		let message = store.insert(new_message("u1", "u2")).await.unwrap();

		let first = store.mark_read(message.id).await.unwrap();
		assert!(first.unwrap().is_read);
		assert!(store.mark_read(message.id).await.unwrap().is_none());
		assert!(store.mark_read(99).await.unwrap().is_none());
		assert!(store.find_by_id(message.id).await.unwrap().unwrap().is_read);
	}

	#[tokio::test]
	async fn test_delete_removes_row() {
		let store = InMemoryMessageRepository::new();
		let message = store.insert(new_message("u1", "u2")).await.unwrap();
		store.delete(message.id).await.unwrap();
		assert!(!store.exists_by_id(message.id).await.unwrap());
		assert!(store.find_by_id(message.id).await.unwrap().is_none());
	}
}
