use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use cutroom_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query parameters accepted by the upgrade endpoint.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Optional JWT, since browsers cannot set headers on WebSocket
    /// connections. Anonymous connections are allowed but only receive
    /// events on the channels they subscribe to.
    pub token: Option<String>,
}

/// Client-to-server control messages.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Subscribe { channel: String },
    Unsubscribe { channel: String },
}

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let user_id: Option<DbId> = params
        .token
        .as_deref()
        .and_then(|t| validate_token(t, &state.config.jwt).ok())
        .map(|claims| claims.sub);

    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager, user_id))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Processes inbound subscribe/unsubscribe messages on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: Option<DbId>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let mut rx = ws_manager.add(conn_id.clone(), user_id).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Subscribe { channel }) => {
                    tracing::debug!(conn_id = %conn_id, channel = %channel, "Subscribed");
                    ws_manager.subscribe(&conn_id, &channel).await;
                }
                Ok(ClientMessage::Unsubscribe { channel }) => {
                    tracing::debug!(conn_id = %conn_id, channel = %channel, "Unsubscribed");
                    ws_manager.unsubscribe(&conn_id, &channel).await;
                }
                Err(e) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Unparseable client message");
                }
            },
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
