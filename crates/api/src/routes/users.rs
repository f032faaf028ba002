//! Route definitions for the `/users` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(user::me))
        .route(
            "/me/publish-credentials",
            put(user::update_publish_credentials),
        )
}
