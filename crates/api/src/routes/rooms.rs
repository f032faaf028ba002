//! Route definitions for the `/rooms` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::room;
use crate::state::AppState;

/// Routes mounted at `/rooms`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(room::create).get(room::list))
        .route("/join", post(room::join))
        .route("/{id}/members", get(room::members))
}
