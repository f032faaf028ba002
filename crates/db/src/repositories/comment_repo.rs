//! Repository for the `video_comments` table.
//!
//! The comment thread is append-only; there are no update or delete paths.

use sqlx::PgPool;

use cutroom_core::types::DbId;

use crate::models::comment::VideoComment;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, video_id, sender_id, body, created_at";

/// Provides append and list operations for video comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment to a video's thread, returning the created row.
    pub async fn append(
        pool: &PgPool,
        video_id: DbId,
        sender_id: DbId,
        body: &str,
    ) -> Result<VideoComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO video_comments (video_id, sender_id, body)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VideoComment>(&query)
            .bind(video_id)
            .bind(sender_id)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// List a video's comments in thread order (oldest first).
    pub async fn list_for_video(
        pool: &PgPool,
        video_id: DbId,
    ) -> Result<Vec<VideoComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_comments
             WHERE video_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, VideoComment>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }
}
