//! Video lifecycle state machine.
//!
//! The entire review-and-publish workflow is driven by one transition table:
//! `(current status, actor, action) -> (next status, side effect)`. Handlers
//! call [`transition`] before touching the database, and the repository layer
//! re-checks the expected current status in the UPDATE's WHERE clause so a
//! concurrent writer cannot slip an off-table transition through.
//!
//! Terminal statuses ([`VideoStatus::Uploaded`], [`VideoStatus::UploadFailed`],
//! [`VideoStatus::RawRejected`]) have no outgoing transitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// VideoStatus
// ---------------------------------------------------------------------------

/// The primary lifecycle status of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    /// Raw footage uploaded by a creator, awaiting an editor's claim.
    RawUploaded,
    /// An editor has claimed the raw footage and is working on it.
    EditingInProgress,
    /// An editor declined the raw footage. Terminal; re-submission happens
    /// out-of-band as a new upload.
    RawRejected,
    /// A finished edit awaiting the creator's review.
    Pending,
    /// Approved and claimed for publishing; the dispatcher owns the video.
    Processing,
    /// Successfully published to the external platform. Terminal.
    Uploaded,
    /// The publish attempt failed. Terminal; requires manual intervention.
    UploadFailed,
    /// The creator rejected the edit. An editor may re-submit.
    Rejected,
}

impl VideoStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: &'static [VideoStatus] = &[
        VideoStatus::RawUploaded,
        VideoStatus::EditingInProgress,
        VideoStatus::RawRejected,
        VideoStatus::Pending,
        VideoStatus::Processing,
        VideoStatus::Uploaded,
        VideoStatus::UploadFailed,
        VideoStatus::Rejected,
    ];

    /// The canonical string form stored in the `videos.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::RawUploaded => "raw_uploaded",
            VideoStatus::EditingInProgress => "editing_in_progress",
            VideoStatus::RawRejected => "raw_rejected",
            VideoStatus::Pending => "pending",
            VideoStatus::Processing => "processing",
            VideoStatus::Uploaded => "uploaded",
            VideoStatus::UploadFailed => "upload_failed",
            VideoStatus::Rejected => "rejected",
        }
    }

    /// Whether this status has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VideoStatus::Uploaded | VideoStatus::UploadFailed | VideoStatus::RawRejected
        )
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VideoStatus::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid video status '{s}'")))
    }
}

// `#[sqlx(try_from = "String")]` on model fields goes through this impl.
impl TryFrom<String> for VideoStatus {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// EditorReviewStatus
// ---------------------------------------------------------------------------

/// Sub-state for raw-footage acceptance. Independent of [`VideoStatus`];
/// only meaningful while the video is in the raw-footage branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorReviewStatus {
    Accepted,
    Rejected,
}

impl EditorReviewStatus {
    /// The canonical string form stored in `videos.editor_review_status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorReviewStatus::Accepted => "accepted",
            EditorReviewStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EditorReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorReviewStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(EditorReviewStatus::Accepted),
            "rejected" => Ok(EditorReviewStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid editor review status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for EditorReviewStatus {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Actor / Action
// ---------------------------------------------------------------------------

/// Who is performing a lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The workspace owner (or the owner of the video's room).
    Creator,
    /// A collaborating editor.
    Editor,
    /// The publish dispatcher reconciling an async outcome.
    System,
}

impl Actor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Creator => "creator",
            Actor::Editor => "editor",
            Actor::System => "system",
        }
    }
}

/// A lifecycle action requested against a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Editor claims raw footage for editing.
    AcceptRaw,
    /// Editor declines raw footage.
    RejectRaw,
    /// Editor submits a finished (or re-worked) edit for review.
    SubmitEdit,
    /// Creator approves the edit for publishing.
    Approve,
    /// Creator rejects the edit.
    Reject,
    /// The dispatcher reports a successful publish.
    PublishSucceeded,
    /// The dispatcher reports a failed publish.
    PublishFailed,
}

impl Action {
    /// The actor role allowed to perform this action.
    pub fn performed_by(&self) -> Actor {
        match self {
            Action::AcceptRaw | Action::RejectRaw | Action::SubmitEdit => Actor::Editor,
            Action::Approve | Action::Reject => Actor::Creator,
            Action::PublishSucceeded | Action::PublishFailed => Actor::System,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AcceptRaw => "accept raw footage",
            Action::RejectRaw => "reject raw footage",
            Action::SubmitEdit => "submit an edit",
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::PublishSucceeded => "record a publish success",
            Action::PublishFailed => "record a publish failure",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// The persisted side effect that accompanies a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Set `editor_id` if unset (first assignment wins) and mark the raw
    /// footage accepted.
    ClaimEditor,
    /// Record the editor's rejection reason and mark the raw footage rejected.
    RecordEditorRejection,
    /// Replace media/title/description/thumbnail and clear any prior
    /// rejection reasons.
    ReplaceEdit,
    /// Hand the video to the publish dispatcher.
    DispatchPublish,
    /// Record the creator's rejection reason, if provided.
    RecordRejection,
    /// Store the external publish id.
    SetPublishId,
    /// Status change only; the failure detail lives in the logs and the
    /// emitted lifecycle event.
    RecordFailure,
}

/// The outcome of a valid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: VideoStatus,
    pub effect: Effect,
}

/// Compute the transition for `(current, actor, action)`.
///
/// Returns [`CoreError::Forbidden`] when the actor role does not match the
/// action, and [`CoreError::Conflict`] when the action is not defined for
/// the current status. Anything this function rejects must not reach the
/// database.
pub fn transition(
    current: VideoStatus,
    actor: Actor,
    action: Action,
) -> Result<Transition, CoreError> {
    if actor != action.performed_by() {
        return Err(CoreError::Forbidden(format!(
            "Only a {} may {}",
            action.performed_by().as_str(),
            action
        )));
    }

    let transition = match (current, action) {
        (VideoStatus::RawUploaded, Action::AcceptRaw) => Transition {
            next: VideoStatus::EditingInProgress,
            effect: Effect::ClaimEditor,
        },
        (VideoStatus::RawUploaded, Action::RejectRaw) => Transition {
            next: VideoStatus::RawRejected,
            effect: Effect::RecordEditorRejection,
        },
        (VideoStatus::EditingInProgress | VideoStatus::Rejected, Action::SubmitEdit) => {
            Transition {
                next: VideoStatus::Pending,
                effect: Effect::ReplaceEdit,
            }
        }
        (VideoStatus::Pending, Action::Approve) => Transition {
            next: VideoStatus::Processing,
            effect: Effect::DispatchPublish,
        },
        (VideoStatus::Pending, Action::Reject) => Transition {
            next: VideoStatus::Rejected,
            effect: Effect::RecordRejection,
        },
        (VideoStatus::Processing, Action::PublishSucceeded) => Transition {
            next: VideoStatus::Uploaded,
            effect: Effect::SetPublishId,
        },
        (VideoStatus::Processing, Action::PublishFailed) => Transition {
            next: VideoStatus::UploadFailed,
            effect: Effect::RecordFailure,
        },
        (current, action) => {
            return Err(CoreError::Conflict(format!(
                "Cannot {action} a video in status '{current}'"
            )))
        }
    };

    Ok(transition)
}

/// Derive the initial status for a newly uploaded video.
///
/// | Uploader | Raw footage | Status                | Editor review |
/// |----------|-------------|-----------------------|---------------|
/// | creator  | no          | `pending`             | —             |
/// | editor   | no          | `pending`             | —             |
/// | creator  | yes         | `raw_uploaded`        | —             |
/// | editor   | yes         | `editing_in_progress` | `accepted`    |
///
/// An editor uploading raw footage is treated as self-claiming it.
pub fn initial_status(
    uploaded_by_editor: bool,
    raw: bool,
) -> (VideoStatus, Option<EditorReviewStatus>) {
    match (uploaded_by_editor, raw) {
        (_, false) => (VideoStatus::Pending, None),
        (false, true) => (VideoStatus::RawUploaded, None),
        (true, true) => (
            VideoStatus::EditingInProgress,
            Some(EditorReviewStatus::Accepted),
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
