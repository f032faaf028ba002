//! Route definitions for the `/videos` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// `/pending` is registered before `/{id}` so it is not captured as an id.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(video::upload).get(video::list))
        .route("/pending", get(video::pending))
        .route("/{id}", get(video::get).delete(video::delete))
        .route("/{id}/approve", post(video::approve))
        .route("/{id}/reject", post(video::reject))
        .route("/{id}/raw-review", post(video::raw_review))
        .route("/{id}/edit", post(video::submit_edit))
        .route("/{id}/thumbnail", put(video::update_thumbnail))
        .route("/{id}/edit-settings", put(video::update_edit_settings))
        .route(
            "/{id}/comments",
            post(video::post_comment).get(video::list_comments),
        )
}
