//! Handlers for the `/rooms` resource (shared creator/editor workspaces).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use cutroom_core::error::CoreError;
use cutroom_core::types::DbId;
use cutroom_db::models::room::{CreateRoom, JoinRoom, Room, RoomMemberInfo};
use cutroom_db::repositories::RoomRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::access;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum room name length.
const MAX_ROOM_NAME_LENGTH: usize = 100;

/// POST /api/v1/rooms
///
/// Create a room owned by the requesting creator. The generated invite
/// token is returned to share with collaborators.
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateRoom>,
) -> AppResult<(StatusCode, Json<DataResponse<Room>>)> {
    if !auth_user.is_creator() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only creators can create rooms".into(),
        )));
    }

    let name = input.name.trim();
    if name.is_empty() || name.len() > MAX_ROOM_NAME_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Room name must be 1-{MAX_ROOM_NAME_LENGTH} characters"
        ))));
    }

    let invite_token = Uuid::new_v4().to_string();
    let room = RoomRepo::create(&state.pool, auth_user.user_id, name, &invite_token).await?;

    // The owner is also a member row so member listings include them.
    RoomRepo::add_member(&state.pool, room.id, auth_user.user_id).await?;

    tracing::info!(room_id = room.id, owner_id = auth_user.user_id, "Room created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(room))))
}

/// GET /api/v1/rooms
///
/// List rooms the requester owns or belongs to.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Room>>>> {
    let rooms = RoomRepo::list_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse::new(rooms)))
}

/// GET /api/v1/rooms/{id}/members
pub async fn members(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RoomMemberInfo>>>> {
    let rc = access::room_context(&state, id, auth_user.user_id).await?;
    if !rc.is_member && !auth_user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not a member of this room".into(),
        )));
    }

    let members = RoomRepo::list_members(&state.pool, id).await?;
    Ok(Json(DataResponse::new(members)))
}

/// POST /api/v1/rooms/join
///
/// Join a room via its invite token. Joining twice is a no-op.
pub async fn join(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<JoinRoom>,
) -> AppResult<Json<DataResponse<Room>>> {
    let room = RoomRepo::find_by_invite_token(&state.pool, &input.invite_token)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Validation("Invalid invite token".into())))?;

    RoomRepo::add_member(&state.pool, room.id, auth_user.user_id).await?;

    tracing::info!(room_id = room.id, user_id = auth_user.user_id, "Joined room");

    Ok(Json(DataResponse::new(room)))
}
