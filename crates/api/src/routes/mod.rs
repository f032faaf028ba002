pub mod auth;
pub mod health;
pub mod rooms;
pub mod users;
pub mod videos;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                WebSocket (optional ?token=)
///
/// /auth/register                     register (public)
/// /auth/login                        login (public)
/// /auth/refresh                      refresh (public)
/// /auth/logout                       logout (requires auth)
///
/// /videos                            upload (POST), list (GET)
/// /videos/pending                    pending review queue (GET)
/// /videos/{id}                       get (GET), delete (DELETE, ?for=me|everyone)
/// /videos/{id}/approve               approve pending edit (POST, 202)
/// /videos/{id}/reject                reject pending edit (POST)
/// /videos/{id}/raw-review            accept/decline raw footage (POST)
/// /videos/{id}/edit                  submit finished edit (POST)
/// /videos/{id}/thumbnail             update thumbnail (PUT)
/// /videos/{id}/edit-settings         update title/description (PUT)
/// /videos/{id}/comments              post (POST), list (GET)
///
/// /rooms                             create (POST), list (GET)
/// /rooms/join                        join via invite token (POST)
/// /rooms/{id}/members                list members (GET)
///
/// /users/me                          profile (GET)
/// /users/me/publish-credentials      store OAuth bundle (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Live event delivery.
        .route("/ws", get(ws::handler::ws_handler))
        // Authentication (register, login, refresh, logout).
        .nest("/auth", auth::router())
        // Video lifecycle, comments, deletion.
        .nest("/videos", videos::router())
        // Shared rooms.
        .nest("/rooms", rooms::router())
        // Profile and publish credentials.
        .nest("/users", users::router())
}
