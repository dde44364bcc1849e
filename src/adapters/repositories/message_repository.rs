use async_trait::async_trait;
use sqlx::PgPool;

use super::MessageStore;
use crate::{
	domain::message::{Message, NewMessage},
	services::response::ServiceError,
};

const COLUMNS: &str = "id, sender_id, receiver_id, item_id, content, is_read, created_at";

#[derive(Clone)]
pub struct MessageRepository {
	pool: PgPool,
}

impl MessageRepository {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl MessageStore for MessageRepository {
	async fn find_all(&self) -> Result<Vec<Message>, ServiceError> {
		let messages = sqlx::query_as::<_, Message>(&format!("SELECT {COLUMNS} FROM messages ORDER BY created_at, id"))
			.fetch_all(&self.pool)
			.await?;
		Ok(messages)
	}

	async fn find_by_id(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError> {
		let message = sqlx::query_as::<_, Message>(&format!("SELECT {COLUMNS} FROM messages WHERE id = $1"))
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;
		Ok(message)
	}

	async fn find_by_participant(
		&self,
		user_id: &str,
	) -> Result<Vec<Message>, ServiceError> {
		let messages = sqlx::query_as::<_, Message>(&format!(
			"SELECT {COLUMNS} FROM messages WHERE sender_id = $1 OR receiver_id = $1 ORDER BY created_at, id"
		))
		.bind(user_id)
		.fetch_all(&self.pool)
		.await?;
		Ok(messages)
	}

	async fn insert(
		&self,
		message: NewMessage,
	) -> Result<Message, ServiceError> {
		let message = sqlx::query_as::<_, Message>(&format!(
			"INSERT INTO messages (sender_id, receiver_id, item_id, content, is_read, created_at) \
			 VALUES ($1, $2, $3, $4, FALSE, $5) RETURNING {COLUMNS}"
		))
		.bind(message.sender_id)
		.bind(message.receiver_id)
		.bind(message.item_id)
		.bind(message.content)
		.bind(message.created_at)
		.fetch_one(&self.pool)
		.await?;
		Ok(message)
	}

	async fn update_content(
		&self,
		id: i64,
		content: &str,
	) -> Result<Message, ServiceError> {
		sqlx::query_as::<_, Message>(&format!("UPDATE messages SET content = $2 WHERE id = $1 RETURNING {COLUMNS}"))
			.bind(id)
			.bind(content)
			.fetch_optional(&self.pool)
			.await?
			.ok_or(ServiceError::EntityNotFound(id))
	}

	async fn mark_read(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError> {
		let message = sqlx::query_as::<_, Message>(&format!(
			"UPDATE messages SET is_read = TRUE WHERE id = $1 AND NOT is_read RETURNING {COLUMNS}"
		))
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;
		Ok(message)
	}

	async fn delete(
		&self,
		id: i64,
	) -> Result<(), ServiceError> {
		sqlx::query("DELETE FROM messages WHERE id = $1").bind(id).execute(&self.pool).await?;
		Ok(())
	}

	async fn exists_by_id(
		&self,
		id: i64,
	) -> Result<bool, ServiceError> {
		let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM messages WHERE id = $1)")
			.bind(id)
			.fetch_one(&self.pool)
			.await?;
		Ok(exists)
	}
}
