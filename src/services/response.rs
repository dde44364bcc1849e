use std::fmt::Display;

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};

pub type AnyError = dyn std::error::Error + Send + Sync + 'static;

#[derive(Debug)]
pub enum ServiceError {
	EntityNotFound(i64),
	ConversationNotFound(String),
	ValidationError(String),
	DatabaseError(Box<AnyError>),
	MessagePublishingError(Box<AnyError>),
	QueueServiceError,
	ParsingError,
	BadRequest,
	UserCloseConnection,
	ConfigError(String),
}

impl std::error::Error for ServiceError {}

impl Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ServiceError::EntityNotFound(id) => write!(f, "Message not found with id: {}", id),
			ServiceError::ConversationNotFound(id) => write!(f, "Conversation not found with id: {}", id),
			ServiceError::ValidationError(reason) => write!(f, "Validation failed: {}", reason),
			ServiceError::DatabaseError(res) => write!(f, "{}", res),
			ServiceError::MessagePublishingError(res) => write!(f, "Message publishing failed: {}", res),
			ServiceError::QueueServiceError => write!(f, "QueueServiceError"),
			ServiceError::ParsingError => write!(f, "ParsingError"),
			ServiceError::BadRequest => write!(f, "BadRequest"),
			ServiceError::UserCloseConnection => write!(f, "UserCloseConnection"),
			ServiceError::ConfigError(reason) => write!(f, "Configuration error: {}", reason),
		}
	}
}

impl From<sqlx::Error> for ServiceError {
	fn from(value: sqlx::Error) -> Self {
		ServiceError::DatabaseError(Box::new(value))
	}
}

impl From<sqlx::migrate::MigrateError> for ServiceError {
	fn from(value: sqlx::migrate::MigrateError) -> Self {
		ServiceError::DatabaseError(Box::new(value))
	}
}

impl ServiceError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			ServiceError::EntityNotFound(_) | ServiceError::ConversationNotFound(_) => StatusCode::NOT_FOUND,
			ServiceError::ValidationError(_) | ServiceError::ParsingError | ServiceError::BadRequest => StatusCode::BAD_REQUEST,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		if status.is_server_error() {
			tracing::error!(error = %self, "Request failed");
		}
		(status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
	}
}

#[test]
fn test_status_mapping() {
	assert_eq!(ServiceError::EntityNotFound(42).status_code(), StatusCode::NOT_FOUND);
	assert_eq!(ServiceError::ValidationError("content".into()).status_code(), StatusCode::BAD_REQUEST);
	assert_eq!(ServiceError::QueueServiceError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(ServiceError::EntityNotFound(42).to_string(), "Message not found with id: 42");
}
