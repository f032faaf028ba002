//! Event-to-WebSocket relay.
//!
//! [`NotificationRelay`] subscribes to the event bus and forwards each
//! lifecycle event to the WebSocket connections subscribed to the event's
//! channel.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;

use cutroom_events::LifecycleEvent;

use crate::ws::WsManager;

/// Forwards lifecycle events to subscribed WebSocket clients.
///
/// Delivery is best-effort: events published while no client is subscribed
/// to the channel are dropped.
pub struct NotificationRelay {
    ws_manager: Arc<WsManager>,
}

impl NotificationRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the main relay loop.
    ///
    /// Consumes events from `receiver` until the channel is closed (i.e.
    /// the [`EventBus`](cutroom_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<LifecycleEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.deliver(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification relay shutting down");
                    break;
                }
            }
        }
    }

    /// Serialize one event and push it to the event's channel.
    async fn deliver(&self, event: &LifecycleEvent) {
        let msg = serde_json::json!({
            "type": "event",
            "event_type": event.event_type,
            "channel": event.channel,
            "video_id": event.video_id,
            "room_id": event.room_id,
            "actor_user_id": event.actor_user_id,
            "payload": event.payload,
            "timestamp": event.timestamp,
        });
        let ws_msg = Message::Text(msg.to_string().into());

        let delivered = self.ws_manager.send_to_channel(&event.channel, ws_msg).await;
        tracing::debug!(
            event_type = %event.event_type,
            channel = %event.channel,
            delivered,
            "Relayed event"
        );
    }
}
