//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`LifecycleEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use cutroom_core::channels;
use cutroom_core::types::DbId;

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// A video lifecycle event to be relayed to live clients.
///
/// The `channel` determines which subscribed WebSocket connections receive
/// the event: `room_{id}` for lifecycle changes of room-scoped videos,
/// `video_{id}` for comments and for videos outside any room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Dot-separated event name, e.g. `"video.uploaded"`.
    pub event_type: String,

    /// Delivery channel key.
    pub channel: String,

    /// The video this event concerns.
    pub video_id: DbId,

    /// The video's room, when it lives in one.
    pub room_id: Option<DbId>,

    /// The user that triggered the event; `None` for dispatcher outcomes.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data (typically the
    /// serialized video or comment).
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl LifecycleEvent {
    /// Create an event for a video, routed to its room channel when it has
    /// a room and to its own video channel otherwise.
    pub fn for_video(event_type: impl Into<String>, video_id: DbId, room_id: Option<DbId>) -> Self {
        let channel = match room_id {
            Some(room_id) => channels::room_channel(room_id),
            None => channels::video_channel(video_id),
        };
        Self {
            event_type: event_type.into(),
            channel,
            video_id,
            room_id,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Create an event routed to the per-video channel regardless of room.
    /// Used for comments.
    pub fn for_video_channel(
        event_type: impl Into<String>,
        video_id: DbId,
        room_id: Option<DbId>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            channel: channels::video_channel(video_id),
            video_id,
            room_id,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`LifecycleEvent`].
pub struct EventBus {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// delivery is best-effort by design.
    pub fn publish(&self, event: LifecycleEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
