use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::NewMessage;
use crate::services::response::ServiceError;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessage {
	pub sender_id: String,
	pub receiver_id: String,
	#[serde(default)]
	pub item_id: Option<i64>,
	pub content: String,
	/// Falls back to the time of creation when absent.
	#[serde(default)]
	pub timestamp: Option<DateTime<Utc>>,
}

impl CreateMessage {
	pub fn validate(self) -> Result<NewMessage, ServiceError> {
		if self.sender_id.trim().is_empty() {
			return Err(ServiceError::ValidationError("senderId must not be empty".into()));
		}
		if self.receiver_id.trim().is_empty() {
			return Err(ServiceError::ValidationError("receiverId must not be empty".into()));
		}
		if self.content.trim().is_empty() {
			return Err(ServiceError::ValidationError("content must not be empty".into()));
		}

		Ok(NewMessage {
			sender_id: self.sender_id,
			receiver_id: self.receiver_id,
			item_id: self.item_id,
			content: self.content,
			created_at: self.timestamp.unwrap_or_else(Utc::now),
		})
	}
}

/// Only the content of a message can be edited; `createdAt` stays put.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessage {
	#[serde(default)]
	pub content: Option<String>,
}

impl UpdateMessage {
	pub fn validate(&self) -> Result<(), ServiceError> {
		match &self.content {
			Some(content) if content.trim().is_empty() => Err(ServiceError::ValidationError("content must not be empty".into())),
			_ => Ok(()),
		}
	}
}

#[cfg(test)]
mod test {
	use chrono::{TimeZone, Utc};

	use super::{CreateMessage, UpdateMessage};
	use crate::services::response::ServiceError;

	fn request(content: &str) -> CreateMessage {
		CreateMessage {
			sender_id: "u1".into(),
			receiver_id: "u2".into(),
			item_id: Some(7),
			content: content.into(),
			timestamp: None,
		}
	}

	#[test]
	fn test_blank_content_is_rejected() {
		assert!(matches!(request("   ").validate(), Err(ServiceError::ValidationError(_))));
		assert!(matches!(request("").validate(), Err(ServiceError::ValidationError(_))));
	}

	#[test]
	fn test_missing_participant_is_rejected() {
		let mut req = request("hi");
		req.receiver_id = String::new();
		assert!(matches!(req.validate(), Err(ServiceError::ValidationError(_))));
	}

	#[test]
	fn test_explicit_timestamp_is_kept() {
		let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
		let mut req = request("hi");
		req.timestamp = Some(at);

		let new_message = req.validate().unwrap();
		assert_eq!(new_message.created_at, at);
		assert_eq!(new_message.item_id, Some(7));
	}

	#[test]
	fn test_request_parses_without_optional_fields() {
		let req: CreateMessage = serde_json::from_str(r#"{"senderId":"u1","receiverId":"u2","content":"hi"}"#).unwrap();
		assert_eq!(req.item_id, None);
		assert_eq!(req.timestamp, None);
	}

	#[test]
	fn test_update_rejects_blank_content_only() {
		assert!(UpdateMessage { content: Some(" ".into()) }.validate().is_err());
		assert!(UpdateMessage { content: Some("edited".into()) }.validate().is_ok());
		assert!(UpdateMessage::default().validate().is_ok());
	}
}
