use std::sync::Arc;

use crate::config::ServerConfig;
use crate::publish::PublishDispatcher;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Every component is constructed explicitly at startup and injected here —
/// there are no module-level singletons. This is cheaply cloneable (inner
/// data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cutroom_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing lifecycle events.
    pub event_bus: Arc<cutroom_events::EventBus>,
    /// Asynchronous publish dispatcher (wraps the external publisher).
    pub dispatcher: Arc<PublishDispatcher>,
}
