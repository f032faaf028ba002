//! Shared fixtures for repository integration tests.

use sqlx::PgPool;

use cutroom_core::lifecycle::{self, VideoStatus};
use cutroom_core::types::DbId;
use cutroom_db::models::user::NewUser;
use cutroom_db::models::video::{NewVideo, Video};
use cutroom_db::repositories::{UserRepo, VideoRepo};

pub async fn create_creator(pool: &PgPool, email: &str) -> DbId {
    let user = UserRepo::create(
        pool,
        &NewUser {
            email: email.to_string(),
            password_hash: Some("x".into()),
            role: "creator".into(),
            creator_id: None,
        },
    )
    .await
    .expect("create creator");
    user.id
}

pub async fn create_editor(pool: &PgPool, email: &str, creator_id: Option<DbId>) -> DbId {
    let user = UserRepo::create(
        pool,
        &NewUser {
            email: email.to_string(),
            password_hash: Some("x".into()),
            role: "editor".into(),
            creator_id,
        },
    )
    .await
    .expect("create editor");
    user.id
}

/// Insert a video with the initial status derived from the uploader facts.
pub async fn upload_video(
    pool: &PgPool,
    creator_id: DbId,
    editor_id: Option<DbId>,
    room_id: Option<DbId>,
    raw: bool,
) -> Video {
    let (status, editor_review_status) = lifecycle::initial_status(editor_id.is_some(), raw);
    VideoRepo::create(
        pool,
        &NewVideo {
            creator_id,
            editor_id,
            room_id,
            title: "Test video".into(),
            description: String::new(),
            media_url: "https://cdn.example.com/v.mp4".into(),
            raw_media_url: raw.then(|| "https://cdn.example.com/v.mp4".into()),
            thumbnail_url: None,
            status,
            editor_review_status,
        },
    )
    .await
    .expect("create video")
}

/// Insert a video already sitting at an arbitrary lifecycle status.
pub async fn video_at_status(pool: &PgPool, creator_id: DbId, status: VideoStatus) -> Video {
    let video = upload_video(pool, creator_id, None, None, false).await;
    sqlx::query("UPDATE videos SET status = $2 WHERE id = $1")
        .bind(video.id)
        .bind(status.as_str())
        .execute(pool)
        .await
        .expect("force status");
    VideoRepo::find_by_id(pool, video.id)
        .await
        .expect("reload")
        .expect("video exists")
}
