//! Handlers for the `/videos` resource: upload, listing, the review
//! lifecycle, comments, and deletion.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use cutroom_core::error::CoreError;
use cutroom_core::lifecycle::{self, Action, Actor, VideoStatus};
use cutroom_core::types::DbId;
use cutroom_core::video as video_rules;
use cutroom_db::models::comment::{CreateComment, VideoComment};
use cutroom_db::models::video::{
    CreateVideoRequest, NewVideo, SubmitEdit, UpdateEditSettings, Video,
};
use cutroom_db::repositories::{CommentRepo, RoomRepo, UserRepo, VideoRepo};
use cutroom_events::LifecycleEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::access;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /videos`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub room_id: Option<DbId>,
    pub status: Option<VideoStatus>,
}

/// Query parameters for `GET /videos/pending`.
#[derive(Debug, Deserialize)]
pub struct PendingParams {
    pub room_id: Option<DbId>,
}

/// Request body for `POST /videos/{id}/reject`.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// Request body for `POST /videos/{id}/raw-review`.
#[derive(Debug, Deserialize)]
pub struct RawReviewRequest {
    /// `"accept"` or `"reject"`.
    pub action: String,
    pub reason: Option<String>,
}

/// Request body for `PUT /videos/{id}/thumbnail`.
#[derive(Debug, Deserialize)]
pub struct ThumbnailRequest {
    pub thumbnail_url: String,
}

/// Query parameters for `DELETE /videos/{id}`.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    /// `"me"` (default) hides the video for the requester only;
    /// `"everyone"` permanently deletes it.
    #[serde(rename = "for")]
    pub target: Option<String>,
}

// ---------------------------------------------------------------------------
// Upload and listing
// ---------------------------------------------------------------------------

/// POST /api/v1/videos
///
/// Upload a video (finished edit or raw footage). The initial status is
/// derived from the uploader's role and the `raw` flag.
pub async fn upload(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateVideoRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Video>>)> {
    video_rules::validate_title(&input.title)?;
    video_rules::validate_description(&input.description)?;
    video_rules::validate_media_url(&input.media_url)?;
    if let Some(thumbnail_url) = &input.thumbnail_url {
        video_rules::validate_media_url(thumbnail_url)?;
    }

    // Resolve the owning creator for the new video.
    let creator_id = if auth_user.is_creator() {
        if let Some(room_id) = input.room_id {
            let rc = access::room_context(&state, room_id, auth_user.user_id).await?;
            if !rc.is_member {
                return Err(AppError::Core(CoreError::Forbidden(
                    "You are not a member of this room".into(),
                )));
            }
        }
        auth_user.user_id
    } else if auth_user.is_editor() {
        match input.room_id {
            Some(room_id) => {
                let rc = access::room_context(&state, room_id, auth_user.user_id).await?;
                if !rc.is_member {
                    return Err(AppError::Core(CoreError::Forbidden(
                        "You are not a member of this room".into(),
                    )));
                }
                // Room uploads belong to the room's owner.
                let room = RoomRepo::find_by_id(&state.pool, room_id).await?.ok_or(
                    AppError::Core(CoreError::NotFound {
                        entity: "room",
                        id: room_id,
                    }),
                )?;
                room.owner_id
            }
            None => UserRepo::find_by_id(&state.pool, auth_user.user_id)
                .await?
                .and_then(|u| u.creator_id)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(
                        "Editor is not linked to a creator; specify a room_id".into(),
                    ))
                })?,
        }
    } else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only creators and editors can upload videos".into(),
        )));
    };

    let uploaded_by_editor = auth_user.is_editor();
    let (status, editor_review_status) = lifecycle::initial_status(uploaded_by_editor, input.raw);

    let new_video = NewVideo {
        creator_id,
        editor_id: uploaded_by_editor.then_some(auth_user.user_id),
        room_id: input.room_id,
        title: input.title,
        description: input.description,
        media_url: input.media_url.clone(),
        raw_media_url: input.raw.then(|| input.media_url),
        thumbnail_url: input.thumbnail_url,
        status,
        editor_review_status,
    };
    let video = VideoRepo::create(&state.pool, &new_video).await?;

    tracing::info!(video_id = video.id, status = %video.status, "Video uploaded");

    state.event_bus.publish(
        LifecycleEvent::for_video("video.created", video.id, video.room_id)
            .with_actor(auth_user.user_id)
            .with_payload(serde_json::to_value(&video).unwrap_or_default()),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(video))))
}

/// GET /api/v1/videos
///
/// List videos visible to the requester, optionally within a room and/or
/// filtered by status. An out-of-scope request yields an empty list, not
/// an error.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Video>>>> {
    let scope = access::resolve_scope(&state, &auth_user, params.room_id).await?;
    let videos =
        VideoRepo::list_scoped(&state.pool, &scope, auth_user.user_id, params.status).await?;
    Ok(Json(DataResponse::new(videos)))
}

/// GET /api/v1/videos/pending
///
/// List videos awaiting the creator's review.
pub async fn pending(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PendingParams>,
) -> AppResult<Json<DataResponse<Vec<Video>>>> {
    let scope = access::resolve_scope(&state, &auth_user, params.room_id).await?;
    let videos = VideoRepo::list_scoped(
        &state.pool,
        &scope,
        auth_user.user_id,
        Some(VideoStatus::Pending),
    )
    .await?;
    Ok(Json(DataResponse::new(videos)))
}

/// GET /api/v1/videos/{id}
pub async fn get(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Video>>> {
    let video = VideoRepo::find_visible_to(&state.pool, id, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    access::ensure_can_view(&state, &auth_user, &video).await?;
    Ok(Json(DataResponse::new(video)))
}

// ---------------------------------------------------------------------------
// Creator review
// ---------------------------------------------------------------------------

/// POST /api/v1/videos/{id}/approve
///
/// Approve a pending edit for publishing. Claims the video atomically
/// (`pending -> processing`) and hands it to the background dispatcher;
/// returns 202 Accepted with the claimed row.
pub async fn approve(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Video>>)> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    access::ensure_can_manage(&state, &auth_user, &video).await?;

    // Reject impossible transitions before touching credentials or state.
    lifecycle::transition(video.status, Actor::Creator, Action::Approve)?;

    // Without a stored refresh token the dispatch would fail immediately,
    // so surface that before any state change.
    let creator = UserRepo::find_by_id(&state.pool, video.creator_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: video.creator_id,
        }))?;
    if !creator.has_publish_credentials() {
        return Err(AppError::Core(CoreError::PreconditionFailed(
            "The creator has not connected publish credentials".into(),
        )));
    }

    // Atomic claim: a concurrent approve observes None here and stops.
    let claimed = VideoRepo::claim_for_publish(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Video is no longer awaiting review".into(),
            ))
        })?;

    tracing::info!(video_id = claimed.id, "Video approved, dispatching publish");

    state.event_bus.publish(
        LifecycleEvent::for_video("video.approved", claimed.id, claimed.room_id)
            .with_actor(auth_user.user_id)
            .with_payload(serde_json::to_value(&claimed).unwrap_or_default()),
    );

    state.dispatcher.spawn(claimed.clone());

    Ok((StatusCode::ACCEPTED, Json(DataResponse::new(claimed))))
}

/// POST /api/v1/videos/{id}/reject
///
/// Reject a pending edit, optionally recording a reason for the editor.
pub async fn reject(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<Json<DataResponse<Video>>> {
    if let Some(reason) = &input.reason {
        video_rules::validate_rejection_reason(reason)?;
    }

    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    access::ensure_can_manage(&state, &auth_user, &video).await?;
    lifecycle::transition(video.status, Actor::Creator, Action::Reject)?;

    let rejected = VideoRepo::reject_pending(&state.pool, id, input.reason.as_deref())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Video is no longer awaiting review".into(),
            ))
        })?;

    state.event_bus.publish(
        LifecycleEvent::for_video("video.rejected", rejected.id, rejected.room_id)
            .with_actor(auth_user.user_id)
            .with_payload(serde_json::to_value(&rejected).unwrap_or_default()),
    );

    Ok(Json(DataResponse::new(rejected)))
}

// ---------------------------------------------------------------------------
// Editor workflow
// ---------------------------------------------------------------------------

/// POST /api/v1/videos/{id}/raw-review
///
/// Accept or decline raw footage. Accepting claims the video for the
/// requesting editor (first claim wins); accepting footage one has already
/// claimed is a no-op rather than an error.
pub async fn raw_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RawReviewRequest>,
) -> AppResult<Json<DataResponse<Video>>> {
    if !auth_user.is_editor() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only an editor may review raw footage".into(),
        )));
    }

    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    access::ensure_can_view(&state, &auth_user, &video).await?;

    match input.action.as_str() {
        "accept" => {
            // Re-accepting one's own claim is idempotent.
            if video.status == VideoStatus::EditingInProgress
                && video.editor_id == Some(auth_user.user_id)
            {
                return Ok(Json(DataResponse::new(video)));
            }

            lifecycle::transition(video.status, Actor::Editor, Action::AcceptRaw)?;

            let claimed = VideoRepo::claim_for_editing(&state.pool, id, auth_user.user_id)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Conflict(
                        "Raw footage is no longer available for review".into(),
                    ))
                })?;

            state.event_bus.publish(
                LifecycleEvent::for_video("video.raw_accepted", claimed.id, claimed.room_id)
                    .with_actor(auth_user.user_id)
                    .with_payload(serde_json::to_value(&claimed).unwrap_or_default()),
            );

            Ok(Json(DataResponse::new(claimed)))
        }
        "reject" => {
            if let Some(reason) = &input.reason {
                video_rules::validate_rejection_reason(reason)?;
            }

            lifecycle::transition(video.status, Actor::Editor, Action::RejectRaw)?;

            let rejected = VideoRepo::reject_raw(&state.pool, id, input.reason.as_deref())
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Conflict(
                        "Raw footage is no longer available for review".into(),
                    ))
                })?;

            state.event_bus.publish(
                LifecycleEvent::for_video("video.raw_rejected", rejected.id, rejected.room_id)
                    .with_actor(auth_user.user_id)
                    .with_payload(serde_json::to_value(&rejected).unwrap_or_default()),
            );

            Ok(Json(DataResponse::new(rejected)))
        }
        other => Err(AppError::Core(CoreError::Validation(format!(
            "Unknown raw-review action '{other}'; expected 'accept' or 'reject'"
        )))),
    }
}

/// POST /api/v1/videos/{id}/edit
///
/// Submit a finished edit. Moves `editing_in_progress` or `rejected` to
/// `pending` and replaces the primary media.
pub async fn submit_edit(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitEdit>,
) -> AppResult<Json<DataResponse<Video>>> {
    if !auth_user.is_editor() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only an editor may submit an edit".into(),
        )));
    }

    video_rules::validate_media_url(&input.media_url)?;
    if let Some(title) = &input.title {
        video_rules::validate_title(title)?;
    }
    if let Some(description) = &input.description {
        video_rules::validate_description(description)?;
    }
    if let Some(thumbnail_url) = &input.thumbnail_url {
        video_rules::validate_media_url(thumbnail_url)?;
    }

    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    access::ensure_can_view(&state, &auth_user, &video).await?;
    lifecycle::transition(video.status, Actor::Editor, Action::SubmitEdit)?;

    let updated = VideoRepo::submit_edit(&state.pool, id, auth_user.user_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Video is not in an editable state".into(),
            ))
        })?;

    state.event_bus.publish(
        LifecycleEvent::for_video("video.edit_submitted", updated.id, updated.room_id)
            .with_actor(auth_user.user_id)
            .with_payload(serde_json::to_value(&updated).unwrap_or_default()),
    );

    Ok(Json(DataResponse::new(updated)))
}

/// PUT /api/v1/videos/{id}/thumbnail
pub async fn update_thumbnail(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ThumbnailRequest>,
) -> AppResult<Json<DataResponse<Video>>> {
    video_rules::validate_media_url(&input.thumbnail_url)?;

    let video = load_for_metadata_update(&state, &auth_user, id).await?;

    let updated = VideoRepo::update_thumbnail(&state.pool, video.id, &input.thumbnail_url)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    Ok(Json(DataResponse::new(updated)))
}

/// PUT /api/v1/videos/{id}/edit-settings
pub async fn update_edit_settings(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEditSettings>,
) -> AppResult<Json<DataResponse<Video>>> {
    if let Some(title) = &input.title {
        video_rules::validate_title(title)?;
    }
    if let Some(description) = &input.description {
        video_rules::validate_description(description)?;
    }

    let video = load_for_metadata_update(&state, &auth_user, id).await?;

    let updated = VideoRepo::update_edit_settings(&state.pool, video.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    Ok(Json(DataResponse::new(updated)))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// POST /api/v1/videos/{id}/comments
pub async fn post_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<VideoComment>>)> {
    video_rules::validate_comment_body(&input.body)?;

    let video = VideoRepo::find_visible_to(&state.pool, id, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    access::ensure_can_view(&state, &auth_user, &video).await?;

    let comment = CommentRepo::append(&state.pool, video.id, auth_user.user_id, &input.body).await?;

    // Comments always go to the per-video channel, even for room videos.
    state.event_bus.publish(
        LifecycleEvent::for_video_channel("video.comment_added", video.id, video.room_id)
            .with_actor(auth_user.user_id)
            .with_payload(serde_json::to_value(&comment).unwrap_or_default()),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(comment))))
}

/// GET /api/v1/videos/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<VideoComment>>>> {
    let video = VideoRepo::find_visible_to(&state.pool, id, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    access::ensure_can_view(&state, &auth_user, &video).await?;

    let comments = CommentRepo::list_for_video(&state.pool, video.id).await?;
    Ok(Json(DataResponse::new(comments)))
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// DELETE /api/v1/videos/{id}?for=me|everyone
///
/// `for=me` (default) hides the video for the requester only and is
/// idempotent. `for=everyone` permanently deletes the row and is restricted
/// to the owning creator (or an admin).
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<DeleteParams>,
) -> AppResult<StatusCode> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    match params.target.as_deref().unwrap_or("me") {
        "me" => {
            access::ensure_can_view(&state, &auth_user, &video).await?;
            VideoRepo::soft_delete_for(&state.pool, id, auth_user.user_id).await?;
            Ok(StatusCode::NO_CONTENT)
        }
        "everyone" => {
            if !auth_user.is_admin() && video.creator_id != auth_user.user_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only the owning creator may delete for everyone".into(),
                )));
            }
            VideoRepo::hard_delete(&state.pool, id).await?;

            state.event_bus.publish(
                LifecycleEvent::for_video("video.deleted", video.id, video.room_id)
                    .with_actor(auth_user.user_id),
            );

            Ok(StatusCode::NO_CONTENT)
        }
        other => Err(AppError::Core(CoreError::Validation(format!(
            "Unknown delete target '{other}'; expected 'me' or 'everyone'"
        )))),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a video for a metadata update (thumbnail / edit settings).
///
/// The requester must manage the video or be its assigned editor, and the
/// video must not already be in the publish pipeline.
async fn load_for_metadata_update(
    state: &AppState,
    auth_user: &AuthUser,
    id: DbId,
) -> AppResult<Video> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "video", id }))?;

    let is_assigned_editor =
        auth_user.is_editor() && video.editor_id == Some(auth_user.user_id);
    if !is_assigned_editor {
        access::ensure_can_manage(state, auth_user, &video).await?;
    }

    if matches!(
        video.status,
        VideoStatus::Processing | VideoStatus::Uploaded
    ) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot modify a video in status '{}'",
            video.status
        ))));
    }

    Ok(video)
}
