//! Cutroom domain logic.
//!
//! Pure, I/O-free building blocks shared by the persistence and API layers:
//!
//! - [`error::CoreError`] — the domain error taxonomy.
//! - [`lifecycle`] — the video status state machine (tagged enums plus an
//!   exhaustive transition table).
//! - [`scope`] — role-based visibility resolution for video queries.
//! - [`video`] — field validation helpers for video metadata and comments.
//! - [`channels`] — notification channel naming conventions.

pub mod channels;
pub mod error;
pub mod lifecycle;
pub mod roles;
pub mod scope;
pub mod types;
pub mod video;
