//! Repository for the `videos` table.
//!
//! All lifecycle transitions are conditional updates: the WHERE clause
//! re-checks the expected current status, so a concurrent writer observes
//! zero affected rows instead of clobbering the newer state. The approve
//! path relies on this for its exactly-once dispatch guarantee
//! ([`VideoRepo::claim_for_publish`]).

use sqlx::PgPool;

use cutroom_core::lifecycle::VideoStatus;
use cutroom_core::scope::VideoScope;
use cutroom_core::types::{DbId, Timestamp};

use crate::models::video::{NewVideo, SubmitEdit, UpdateEditSettings, Video};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, creator_id, editor_id, room_id, title, description, media_url, \
                       raw_media_url, thumbnail_url, status, editor_review_status, \
                       rejection_reason, editor_rejection_reason, youtube_video_id, \
                       hidden_for, created_at, updated_at";

/// Provides CRUD and lifecycle-transition operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new video, returning the created row.
    ///
    /// The initial status and review sub-state come pre-computed from the
    /// lifecycle engine; this method does not derive them.
    pub async fn create(pool: &PgPool, input: &NewVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (creator_id, editor_id, room_id, title, description, media_url, \
                                 raw_media_url, thumbnail_url, status, editor_review_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(input.creator_id)
            .bind(input.editor_id)
            .bind(input.room_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.media_url)
            .bind(&input.raw_media_url)
            .bind(&input.thumbnail_url)
            .bind(input.status.as_str())
            .bind(input.editor_review_status.map(|s| s.as_str()))
            .fetch_one(pool)
            .await
    }

    /// Find a video by id, regardless of viewer.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a video by id, excluding videos the viewer soft-deleted.
    pub async fn find_visible_to(
        pool: &PgPool,
        id: DbId,
        viewer_id: DbId,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE id = $1 AND NOT (hidden_for @> ARRAY[$2]::BIGINT[])"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(viewer_id)
            .fetch_optional(pool)
            .await
    }

    /// List videos matching a resolved scope, newest first.
    ///
    /// Always excludes videos the viewer soft-deleted. A `None` scope field
    /// skips its clause; the editor clause implements the open pool
    /// (`editor_id = viewer OR editor_id IS NULL`).
    pub async fn list_scoped(
        pool: &PgPool,
        scope: &VideoScope,
        viewer_id: DbId,
        status: Option<VideoStatus>,
    ) -> Result<Vec<Video>, sqlx::Error> {
        if scope.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE NOT (hidden_for @> ARRAY[$1]::BIGINT[])
               AND ($2::BIGINT IS NULL OR creator_id = $2)
               AND ($3::BIGINT IS NULL OR room_id = $3)
               AND ($4::BIGINT IS NULL OR editor_id = $4 OR editor_id IS NULL)
               AND ($5::TEXT IS NULL OR status = $5)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(viewer_id)
            .bind(scope.creator_scope_id)
            .bind(scope.room_id)
            .bind(scope.editor_scope_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// `raw_uploaded -> editing_in_progress`: the editor claims the footage.
    ///
    /// First assignment wins: `editor_id` is only set when currently NULL.
    /// Returns `None` when the video is not in `raw_uploaded`.
    pub async fn claim_for_editing(
        pool: &PgPool,
        id: DbId,
        editor_id: DbId,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                status = 'editing_in_progress',
                editor_id = COALESCE(editor_id, $2),
                editor_review_status = 'accepted',
                updated_at = NOW()
             WHERE id = $1 AND status = 'raw_uploaded'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(editor_id)
            .fetch_optional(pool)
            .await
    }

    /// `raw_uploaded -> raw_rejected`: the editor declines the footage.
    pub async fn reject_raw(
        pool: &PgPool,
        id: DbId,
        reason: Option<&str>,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                status = 'raw_rejected',
                editor_review_status = 'rejected',
                editor_rejection_reason = $2,
                updated_at = NOW()
             WHERE id = $1 AND status = 'raw_uploaded'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// `editing_in_progress | rejected -> pending`: a finished edit replaces
    /// the primary media and clears any prior rejection reasons.
    ///
    /// Assigns `editor_id` when still unset, which covers the open-pool case
    /// of an editor re-working a rejected video nobody had claimed.
    pub async fn submit_edit(
        pool: &PgPool,
        id: DbId,
        editor_id: DbId,
        input: &SubmitEdit,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                media_url = $2,
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                thumbnail_url = COALESCE($5, thumbnail_url),
                editor_id = COALESCE(editor_id, $6),
                status = 'pending',
                rejection_reason = NULL,
                editor_rejection_reason = NULL,
                updated_at = NOW()
             WHERE id = $1 AND status IN ('editing_in_progress', 'rejected')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.media_url)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.thumbnail_url)
            .bind(editor_id)
            .fetch_optional(pool)
            .await
    }

    /// `pending -> processing`: atomic publish claim.
    ///
    /// At most one caller can win this update for a given video; concurrent
    /// approvals observe `None` and must not dispatch.
    pub async fn claim_for_publish(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET status = 'processing', updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// `pending -> rejected`: the creator rejects the edit.
    pub async fn reject_pending(
        pool: &PgPool,
        id: DbId,
        reason: Option<&str>,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                status = 'rejected',
                rejection_reason = $2,
                updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// `processing -> uploaded`: record the external publish id.
    pub async fn mark_uploaded(
        pool: &PgPool,
        id: DbId,
        external_id: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                status = 'uploaded',
                youtube_video_id = $2,
                updated_at = NOW()
             WHERE id = $1 AND status = 'processing'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// `processing -> upload_failed`: the publish attempt failed.
    pub async fn mark_upload_failed(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET status = 'upload_failed', updated_at = NOW()
             WHERE id = $1 AND status = 'processing'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update the thumbnail URL. No status change.
    pub async fn update_thumbnail(
        pool: &PgPool,
        id: DbId,
        thumbnail_url: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET thumbnail_url = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(thumbnail_url)
            .fetch_optional(pool)
            .await
    }

    /// Update title/description. Only non-`None` fields are applied.
    pub async fn update_edit_settings(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEditSettings,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Hide the video for one user ("delete for me"). Idempotent: returns
    /// `false` when the user was already in the hidden set.
    pub async fn soft_delete_for(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE videos SET hidden_for = hidden_for || $2, updated_at = NOW()
             WHERE id = $1 AND NOT (hidden_for @> ARRAY[$2]::BIGINT[])",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a video ("delete for everyone"). The caller must
    /// have verified creator ownership. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Claim videos stuck in `processing` since before `cutoff`.
    ///
    /// Used by the recovery sweep to re-dispatch videos stranded by a crash
    /// between the publish claim and the dispatcher's completion. Bumping
    /// `updated_at` is the claim: each row is handed out at most once per
    /// staleness window, so a sweep cannot re-dispatch a video that a
    /// previous sweep (or another process) already picked up.
    pub async fn claim_stale_processing(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET updated_at = NOW()
             WHERE status = 'processing' AND updated_at < $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }
}
