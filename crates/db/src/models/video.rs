//! Video entity model and mutation inputs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cutroom_core::lifecycle::{EditorReviewStatus, VideoStatus};
use cutroom_core::types::{DbId, Timestamp};

/// A video row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub creator_id: DbId,
    pub editor_id: Option<DbId>,
    pub room_id: Option<DbId>,

    pub title: String,
    pub description: String,
    pub media_url: String,
    pub raw_media_url: Option<String>,
    pub thumbnail_url: Option<String>,

    #[sqlx(try_from = "String")]
    pub status: VideoStatus,
    /// Raw-footage review sub-state, stored as its canonical string form.
    /// Use [`Video::editor_review_status`] for the typed view.
    #[serde(rename = "editor_review_status")]
    pub editor_review_status: Option<String>,
    pub rejection_reason: Option<String>,
    pub editor_rejection_reason: Option<String>,

    /// External publish id; set if and only if `status` is `uploaded`
    /// (enforced by a CHECK constraint).
    pub youtube_video_id: Option<String>,

    /// Soft-delete set: user ids for whom this video is hidden.
    pub hidden_for: Vec<DbId>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Video {
    /// Typed view of the raw-footage review sub-state.
    pub fn editor_review_status(&self) -> Option<EditorReviewStatus> {
        self.editor_review_status
            .as_deref()
            .and_then(|s| s.parse().ok())
    }
}

/// Request body for `POST /videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub room_id: Option<DbId>,
    /// Whether this is raw (pre-edit) footage.
    #[serde(default)]
    pub raw: bool,
}

/// Fully resolved insert input, built by the handler from a
/// [`CreateVideoRequest`] plus the authenticated uploader's identity and the
/// initial status from the lifecycle engine.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub creator_id: DbId,
    pub editor_id: Option<DbId>,
    pub room_id: Option<DbId>,
    pub title: String,
    pub description: String,
    pub media_url: String,
    pub raw_media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub status: VideoStatus,
    pub editor_review_status: Option<EditorReviewStatus>,
}

/// Input for the `upload-edit` transition: replaces the primary media and,
/// where provided, the review metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitEdit {
    pub media_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Request body for `PUT /videos/{id}/edit-settings`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEditSettings {
    pub title: Option<String>,
    pub description: Option<String>,
}
