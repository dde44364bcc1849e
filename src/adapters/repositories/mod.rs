pub(crate) mod memory;
pub(crate) mod message_repository;

use async_trait::async_trait;

pub use self::memory::InMemoryMessageRepository;
pub use self::message_repository::MessageRepository;
use crate::{
	domain::message::{Message, NewMessage},
	services::response::ServiceError,
};

/// Keyed message storage. Each call is atomic per row; nothing here spans
/// more than one row.
#[async_trait]
pub trait MessageStore: Send + Sync {
	async fn find_all(&self) -> Result<Vec<Message>, ServiceError>;

	async fn find_by_id(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError>;

	/// Every message the user sent or received.
	async fn find_by_participant(
		&self,
		user_id: &str,
	) -> Result<Vec<Message>, ServiceError>;

	async fn insert(
		&self,
		message: NewMessage,
	) -> Result<Message, ServiceError>;

	/// Replaces the content of an existing row. `is_read` is left as stored.
	async fn update_content(
		&self,
		id: i64,
		content: &str,
	) -> Result<Message, ServiceError>;

	/// Flips `is_read` to true. Returns the row only when this call did the
	/// flip; an already read or missing row yields `None`.
	async fn mark_read(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError>;

	async fn delete(
		&self,
		id: i64,
	) -> Result<(), ServiceError>;

	async fn exists_by_id(
		&self,
		id: i64,
	) -> Result<bool, ServiceError>;
}
