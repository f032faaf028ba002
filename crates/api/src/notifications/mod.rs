//! Live notification delivery from the event bus to WebSocket clients.

pub mod relay;

pub use relay::NotificationRelay;
