//! Shared access-control helpers for video and room handlers.
//!
//! Authorization facts (role, room membership, creator links) are gathered
//! here; the actual visibility decision is made by the pure scope resolver
//! in `cutroom_core::scope`.

use cutroom_core::error::CoreError;
use cutroom_core::scope::{self, RequesterRole, RoomContext, ScopeRequest, VideoScope};
use cutroom_core::types::DbId;
use cutroom_db::models::video::Video;
use cutroom_db::repositories::{RoomRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Map the JWT role claim to the scope resolver's role enum.
pub fn requester_role(auth_user: &AuthUser) -> AppResult<RequesterRole> {
    if auth_user.is_admin() {
        Ok(RequesterRole::Admin)
    } else if auth_user.is_creator() {
        Ok(RequesterRole::Creator)
    } else if auth_user.is_editor() {
        Ok(RequesterRole::Editor)
    } else {
        Err(AppError::Core(CoreError::Forbidden(format!(
            "Unknown role '{}'",
            auth_user.role
        ))))
    }
}

/// Gather room ownership/membership facts for a user.
///
/// Room owners count as members regardless of whether their member row
/// still exists.
pub async fn room_context(
    state: &AppState,
    room_id: DbId,
    user_id: DbId,
) -> AppResult<RoomContext> {
    let room = RoomRepo::find_by_id(&state.pool, room_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "room",
            id: room_id,
        }))?;

    let is_owner = room.owner_id == user_id;
    let is_member = is_owner || RoomRepo::is_member(&state.pool, room_id, user_id).await?;

    Ok(RoomContext {
        room_id,
        is_owner,
        is_member,
    })
}

/// Resolve the requester's visibility scope, optionally within a room.
pub async fn resolve_scope(
    state: &AppState,
    auth_user: &AuthUser,
    room_id: Option<DbId>,
) -> AppResult<VideoScope> {
    let role = requester_role(auth_user)?;

    let room = match room_id {
        Some(room_id) => Some(room_context(state, room_id, auth_user.user_id).await?),
        None => None,
    };

    let linked_creator_id = if role == RequesterRole::Editor {
        UserRepo::find_by_id(&state.pool, auth_user.user_id)
            .await?
            .and_then(|u| u.creator_id)
    } else {
        None
    };

    Ok(scope::resolve(ScopeRequest {
        user_id: auth_user.user_id,
        role,
        linked_creator_id,
        room,
    }))
}

/// Whether a video falls inside a resolved scope.
///
/// Mirrors the filter clauses of the scoped list query so single-video
/// access checks and list visibility cannot drift apart.
pub fn scope_matches(scope: &VideoScope, video: &Video, viewer_id: DbId) -> bool {
    if video.hidden_for.contains(&viewer_id) {
        return false;
    }
    if scope.unrestricted {
        return true;
    }
    if scope.is_empty() {
        return false;
    }
    if let Some(creator_id) = scope.creator_scope_id {
        if video.creator_id != creator_id {
            return false;
        }
    }
    if let Some(room_id) = scope.room_id {
        if video.room_id != Some(room_id) {
            return false;
        }
    }
    if let Some(editor_id) = scope.editor_scope_id {
        if !(video.editor_id.is_none() || video.editor_id == Some(editor_id)) {
            return false;
        }
    }
    true
}

/// Ensure the requester may view the video, resolving scope against the
/// video's own room. Returns `Forbidden` rather than `NotFound`; callers
/// that must not leak existence should fetch via `find_visible_to` first.
pub async fn ensure_can_view(
    state: &AppState,
    auth_user: &AuthUser,
    video: &Video,
) -> AppResult<()> {
    // Scope resolution treats a room the requester cannot access as an
    // empty scope, not an error, so errors from room_context here would
    // only be NotFound for a dangling room id.
    let scope = resolve_scope(state, auth_user, video.room_id).await?;
    if scope_matches(&scope, video, auth_user.user_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this video".into(),
        )))
    }
}

/// Ensure the requester may act as the video's creator: the owning
/// creator, the owner of the video's room, or an admin.
pub async fn ensure_can_manage(
    state: &AppState,
    auth_user: &AuthUser,
    video: &Video,
) -> AppResult<()> {
    if auth_user.is_admin() || video.creator_id == auth_user.user_id {
        return Ok(());
    }

    if auth_user.is_creator() {
        if let Some(room_id) = video.room_id {
            let rc = room_context(state, room_id, auth_user.user_id).await?;
            if rc.is_owner {
                return Ok(());
            }
        }
    }

    Err(AppError::Core(CoreError::Forbidden(
        "Only the video's creator may do this".into(),
    )))
}
