use serde::{Deserialize, Serialize};

use crate::{
	domain::message::{
		events::{DeliveryReceipt, TypingStatus},
		CreateMessage,
	},
	services::response::ServiceError,
};

/// Frames a realtime client may send over its socket.
#[derive(Debug, Deserialize, Serialize)]
pub enum ClientMessage {
	Subscribe {
		#[serde(rename = "userId")]
		user_id: String,
	},
	SendMessage(CreateMessage),
	MarkRead {
		#[serde(rename = "messageId")]
		message_id: i64,
	},
	ConfirmDelivery(DeliveryReceipt),
	Typing(TypingStatus),
}

impl TryFrom<axum::extract::ws::Message> for ClientMessage {
	type Error = ServiceError;
	fn try_from(value: axum::extract::ws::Message) -> Result<Self, Self::Error> {
		match value {
			axum::extract::ws::Message::Text(string_value) => {
				serde_json::from_str::<ClientMessage>(&string_value).map_err(|_err| ServiceError::ParsingError)
			}

			axum::extract::ws::Message::Close(_close_frame) => Err(ServiceError::UserCloseConnection),
			_ => Err(ServiceError::BadRequest),
		}
	}
}

#[test]
fn test_enum_representation() {
	let frame = r#"{"Subscribe":{"userId":"Migo"}}"#;
	let parsed: ClientMessage = axum::extract::ws::Message::Text(frame.into()).try_into().unwrap();
	assert!(matches!(parsed, ClientMessage::Subscribe { user_id } if user_id == "Migo"));

	let frame = r#"{"SendMessage":{"senderId":"u1","receiverId":"u2","itemId":7,"content":"hi"}}"#;
	let parsed: ClientMessage = axum::extract::ws::Message::Text(frame.into()).try_into().unwrap();
	assert!(matches!(parsed, ClientMessage::SendMessage(request) if request.item_id == Some(7)));

	let frame = r#"{"Typing":{"userId":"u1","receiverId":"u2","isTyping":true}}"#;
	let parsed: ClientMessage = axum::extract::ws::Message::Text(frame.into()).try_into().unwrap();
	assert!(matches!(parsed, ClientMessage::Typing(status) if status.is_typing));
}

#[test]
fn test_non_text_frames_are_rejected() {
	let close: Result<ClientMessage, _> = axum::extract::ws::Message::Close(None).try_into();
	assert!(matches!(close, Err(ServiceError::UserCloseConnection)));

	let garbage: Result<ClientMessage, _> = axum::extract::ws::Message::Text("not json".into()).try_into();
	assert!(matches!(garbage, Err(ServiceError::ParsingError)));

	let binary: Result<ClientMessage, _> = axum::extract::ws::Message::Binary(vec![1, 2]).try_into();
	assert!(matches!(binary, Err(ServiceError::BadRequest)));
}
