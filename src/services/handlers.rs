use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures::{
	stream::{self, BoxStream, SelectAll, SplitSink, SplitStream},
	SinkExt, StreamExt,
};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::response::ServiceError;
use crate::domain::chat::{schemas::ClientMessage, ChatState, ChatStateWrapper};

pub type Inbox = SelectAll<BoxStream<'static, Bytes>>;

pub struct ChatHandler;
impl ChatHandler {
	/// This function deals with a single websocket connection, i.e., a single
	/// connected client / user. The first frame must be `Subscribe`; after that
	/// two independent tasks forward notifications out and client frames in.
	pub async fn run_socket_broker(
		stream: WebSocket,
		state: ChatStateWrapper,
	) {
		let (mut sender, mut receiver) = stream.split();

		let Some(user_id) = ChatHandler::wait_for_subscription(&mut receiver).await else {
			let _ = sender.send(Message::Text(String::from("Wrong input was given"))).await;
			return;
		};

		let inbox = match ChatHandler::open_inbox(&user_id, &state).await {
			Ok(inbox) => inbox,
			Err(err) => {
				tracing::error!("Could not subscribe user {} to notifications: {}", user_id, err);
				let _ = sender.send(Message::Text(String::from("Subscription failed!"))).await;
				return;
			}
		};
		let session_id = Uuid::new_v4();
		tracing::info!(%session_id, "User {} joined realtime messaging", user_id);

		let mut send_task = ChatHandler::_send_notifications_to_this_user(inbox, sender);
		let mut recv_task = ChatHandler::_receive_messages_from_this_user(receiver, state.clone(), user_id.clone());

		// Waits on multiple concurrent branches, returning when the first branch completes,
		// cancelling the remaining branches.
		tokio::select! {
			_ = (&mut send_task) => recv_task.abort(),
			_ = (&mut recv_task) => send_task.abort(),
		};
		tracing::info!(%session_id, "User {} left realtime messaging", user_id);
	}

	async fn wait_for_subscription(receiver: &mut SplitStream<WebSocket>) -> Option<String> {
		while let Some(Ok(message)) = receiver.next().await {
			if matches!(message, Message::Ping(_) | Message::Pong(_)) {
				continue;
			}
			return match message.try_into() {
				Ok(ClientMessage::Subscribe { user_id }) => Some(user_id),
				Ok(other) => {
					tracing::warn!("Expected a subscription first, got {:?}", other);
					None
				}
				Err(err) => {
					tracing::warn!("Rejected opening frame: {}", err);
					None
				}
			};
		}
		None
	}

	/// Merges every subject the user listens on into a single stream.
	pub async fn open_inbox(
		user_id: &str,
		state: &ChatState,
	) -> Result<Inbox, ServiceError> {
		let mut subscriptions = Vec::new();
		for subject in ChatState::subjects_for(user_id) {
			subscriptions.push(state.queue.subscribe(subject).await?);
		}
		Ok(stream::select_all(subscriptions))
	}

	/// Applies one client frame on behalf of `user_id`.
	pub async fn dispatch(
		client_message: ClientMessage,
		state: &ChatState,
		user_id: &str,
	) -> Result<(), ServiceError> {
		match client_message {
			ClientMessage::Subscribe { .. } => {
				tracing::warn!("User {} is already subscribed", user_id);
			}
			ClientMessage::SendMessage(request) => {
				tracing::info!("Received WebSocket message from: {}", request.sender_id);
				state.messages.create_message(request).await?;
			}
			ClientMessage::MarkRead { message_id } => {
				state.messages.mark_read(message_id).await?;
			}
			ClientMessage::ConfirmDelivery(receipt) => {
				let _ = state.broadcaster.delivery_confirmed(&receipt).await;
			}
			ClientMessage::Typing(status) => {
				let _ = state.broadcaster.typing(&status).await;
			}
		}
		Ok(())
	}

	fn _send_notifications_to_this_user(
		mut inbox: Inbox,
		mut sender: SplitSink<WebSocket, Message>,
	) -> JoinHandle<()> {
		tokio::spawn(async move {
			while let Some(payload) = inbox.next().await {
				let Ok(text) = String::from_utf8(payload.to_vec()) else {
					tracing::warn!("Dropping non UTF-8 notification");
					continue;
				};
				if sender.send(Message::Text(text)).await.is_err() {
					break;
				}
			}
		})
	}

	fn _receive_messages_from_this_user(
		mut receiver: SplitStream<WebSocket>,
		state: ChatStateWrapper,
		user_id: String,
	) -> JoinHandle<Result<(), ServiceError>> {
		tokio::spawn(async move {
			while let Some(Ok(message)) = receiver.next().await {
				match ClientMessage::try_from(message) {
					Ok(client_message) => {
						if let Err(err) = ChatHandler::dispatch(client_message, &state, &user_id).await {
							tracing::warn!("Frame from user {} failed: {}", user_id, err);
						}
					}
					Err(ServiceError::UserCloseConnection) => return Ok(()),
					Err(ServiceError::BadRequest) => continue,
					Err(err) => tracing::warn!("Unreadable frame from user {}: {}", user_id, err),
				}
			}
			Ok(())
		})
	}
}
