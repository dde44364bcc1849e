use axum::{
	extract::{Path, Query, State, WebSocketUpgrade},
	http::StatusCode,
	response::IntoResponse,
	routing::{get, put},
	Json, Router,
};
use serde::Deserialize;

use messaging::{
	domain::{
		chat::ChatStateWrapper,
		conversation::ConversationSummary,
		message::{CreateMessage, Message, UpdateMessage},
	},
	services::{handlers::ChatHandler, response::ServiceError},
};

#[derive(Deserialize)]
pub struct Participant {
	#[serde(rename = "userId")]
	user_id: String,
}

async fn list_messages(State(state): State<ChatStateWrapper>) -> Result<Json<Vec<Message>>, ServiceError> {
	Ok(Json(state.messages.list_messages().await?))
}

async fn get_message(
	Path(id): Path<i64>,
	State(state): State<ChatStateWrapper>,
) -> Result<Json<Message>, ServiceError> {
	Ok(Json(state.messages.get_message(id).await?))
}

#[axum_macros::debug_handler]
async fn create_message(
	State(state): State<ChatStateWrapper>,
	Json(request): Json<CreateMessage>,
) -> Result<impl IntoResponse, ServiceError> {
	let message = state.messages.create_message(request).await?;
	Ok((StatusCode::CREATED, Json(message)))
}

async fn update_message(
	Path(id): Path<i64>,
	State(state): State<ChatStateWrapper>,
	Json(request): Json<UpdateMessage>,
) -> Result<Json<Message>, ServiceError> {
	Ok(Json(state.messages.update_message(id, request).await?))
}

async fn mark_read(
	Path(id): Path<i64>,
	State(state): State<ChatStateWrapper>,
) -> Result<Json<Message>, ServiceError> {
	Ok(Json(state.messages.mark_read(id).await?))
}

async fn delete_message(
	Path(id): Path<i64>,
	State(state): State<ChatStateWrapper>,
) -> Result<StatusCode, ServiceError> {
	state.messages.delete_message(id).await?;
	Ok(StatusCode::NO_CONTENT)
}

async fn list_conversations(
	Query(participant): Query<Participant>,
	State(state): State<ChatStateWrapper>,
) -> Result<Json<Vec<ConversationSummary>>, ServiceError> {
	Ok(Json(state.conversations.list_conversations(&participant.user_id).await?))
}

async fn archive_conversation(
	Path(conversation_id): Path<String>,
	Query(participant): Query<Participant>,
	State(state): State<ChatStateWrapper>,
) -> Result<StatusCode, ServiceError> {
	state.conversations.archive_conversation(&conversation_id, &participant.user_id).await?;
	Ok(StatusCode::OK)
}

async fn delete_conversation(
	Path(conversation_id): Path<String>,
	Query(participant): Query<Participant>,
	State(state): State<ChatStateWrapper>,
) -> Result<StatusCode, ServiceError> {
	state.conversations.delete_conversation(&conversation_id, &participant.user_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

async fn chat_websocket_route(
	ws: WebSocketUpgrade,
	State(state): State<ChatStateWrapper>,
) -> impl IntoResponse {
	ws.on_upgrade(|socket| ChatHandler::run_socket_broker(socket, state))
}

pub fn message_routers() -> Router<ChatStateWrapper> {
	Router::new()
		.route("/", get(list_messages).post(create_message))
		.route("/:id", get(get_message).put(update_message).delete(delete_message))
		.route("/:id/read", put(mark_read))
}

pub fn conversation_routers() -> Router<ChatStateWrapper> {
	Router::new()
		.route("/", get(list_conversations))
		.route("/:conversation_id", axum::routing::delete(delete_conversation))
		.route("/:conversation_id/archive", axum::routing::post(archive_conversation))
}

pub fn chat_routers() -> Router<ChatStateWrapper> {
	Router::new().route("/ws", get(chat_websocket_route))
}

pub fn app(state: ChatStateWrapper) -> Router {
	Router::new()
		.nest("/messages", message_routers())
		.nest("/conversations", conversation_routers())
		.merge(chat_routers())
		.with_state(state)
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use axum::{
		body::{Body, HttpBody},
		http::{Request, StatusCode},
		response::Response,
		Router,
	};
	use messaging::{
		adapters::{queue::LocalHub, repositories::InMemoryMessageRepository},
		bootstrap::Bootstrap,
	};
	use tower::ServiceExt;

	fn router() -> Router {
		super::app(Bootstrap::assemble(Arc::new(InMemoryMessageRepository::new()), Arc::new(LocalHub::new(16))))
	}

	fn json_request(
		method: &str,
		uri: &str,
		body: serde_json::Value,
	) -> Request<Body> {
		Request::builder()
			.method(method)
			.uri(uri)
			.header("content-type", "application/json")
			.body(Body::from(body.to_string()))
			.unwrap()
	}

	fn empty_request(
		method: &str,
		uri: &str,
	) -> Request<Body> {
		Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
	}

	async fn body_json(response: Response) -> serde_json::Value {
		let mut body = response.into_body();
		let mut raw = Vec::new();
		while let Some(chunk) = body.data().await {
			raw.extend_from_slice(&chunk.unwrap());
		}
		serde_json::from_slice(&raw).unwrap()
	}

	#[tokio::test]
	async fn test_create_then_list_conversations() {
		let app = router();

		let response = app
			.clone()
			.oneshot(json_request(
				"POST",
				"/messages",
				serde_json::json!({"senderId": "u1", "receiverId": "u2", "itemId": 7, "content": "hi"}),
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::CREATED);
		let created = body_json(response).await;
		assert_eq!(created["isRead"], false);

		let response = app.oneshot(empty_request("GET", "/conversations?userId=u2")).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let conversations = body_json(response).await;
		assert_eq!(conversations[0]["conversationId"], "u1_u2_7");
		assert_eq!(conversations[0]["lastMessage"], "hi");
		assert_eq!(conversations[0]["archived"], false);
	}

	#[tokio::test]
	async fn test_error_statuses() {
		let app = router();

		let response = app
			.clone()
			.oneshot(json_request("POST", "/messages", serde_json::json!({"senderId": "u1", "receiverId": "u2", "content": ""})))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let response = app.clone().oneshot(empty_request("DELETE", "/messages/42")).await.unwrap();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);

		let response = app.oneshot(empty_request("PUT", "/messages/42/read")).await.unwrap();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_archive_answers_ok_without_state_change() {
		let app = router();
		let response = app.oneshot(empty_request("POST", "/conversations/u1_u2_7/archive?userId=u1")).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
	}
}
