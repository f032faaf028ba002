//! Video comment models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cutroom_core::types::{DbId, Timestamp};

/// A comment row from the `video_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoComment {
    pub id: DbId,
    pub video_id: DbId,
    pub sender_id: DbId,
    pub body: String,
    pub created_at: Timestamp,
}

/// Request body for `POST /videos/{id}/comments`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub body: String,
}
