//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use cutroom_core::error::CoreError;
use cutroom_db::models::user::{UpdatePublishCredentials, User};
use cutroom_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// `GET /users/me` payload: the user row plus a derived credential flag
/// (the tokens themselves are never serialized).
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
    pub has_publish_credentials: bool,
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth_user.user_id,
        }))?;

    let has_publish_credentials = user.has_publish_credentials();
    Ok(Json(DataResponse::new(MeResponse {
        user,
        has_publish_credentials,
    })))
}

/// PUT /api/v1/users/me/publish-credentials
///
/// Store the OAuth token bundle used to publish on the creator's behalf.
/// Returns 204 No Content.
pub async fn update_publish_credentials(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdatePublishCredentials>,
) -> AppResult<StatusCode> {
    if !auth_user.is_creator() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only creators can store publish credentials".into(),
        )));
    }

    if input.access_token.trim().is_empty() || input.refresh_token.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "access_token and refresh_token are required".into(),
        )));
    }

    let updated = UserRepo::update_publish_credentials(
        &state.pool,
        auth_user.user_id,
        &input.access_token,
        &input.refresh_token,
    )
    .await?;

    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth_user.user_id,
        }));
    }

    tracing::info!(user_id = auth_user.user_id, "Publish credentials updated");
    Ok(StatusCode::NO_CONTENT)
}
