//! HTTP request handlers, grouped by resource.

pub mod auth;
pub mod room;
pub mod user;
pub mod video;

mod access;
