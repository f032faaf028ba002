//! Notification channel naming.
//!
//! Live clients subscribe to string-keyed channels over WebSocket. Lifecycle
//! events for room-scoped videos go to the room channel; comments (and
//! lifecycle events of videos outside any room) go to the per-video channel.

use crate::types::DbId;

/// Channel carrying lifecycle events for all videos in a room.
pub fn room_channel(room_id: DbId) -> String {
    format!("room_{room_id}")
}

/// Channel carrying events for a single video.
pub fn video_channel(video_id: DbId) -> String {
    format!("video_{video_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        assert_eq!(room_channel(12), "room_12");
        assert_eq!(video_channel(7), "video_7");
    }
}
