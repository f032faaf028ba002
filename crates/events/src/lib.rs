//! Cutroom lifecycle event bus.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`LifecycleEvent`] — the canonical event envelope for video lifecycle
//!   changes and comments.
//!
//! Delivery is best-effort and at-most-once: there is no persistence or
//! replay, and a disconnected client misses events until it re-fetches.

pub mod bus;

pub use bus::{EventBus, LifecycleEvent};
