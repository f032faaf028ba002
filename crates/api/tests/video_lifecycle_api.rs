//! HTTP-level integration tests for the video lifecycle: upload, raw
//! review, edit submission, creator review, and deletion.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_json, connect_publish_credentials, create_user, delete_auth, get_auth, post_json_auth,
    put_json_auth, token_for, StubPublisher,
};
use sqlx::PgPool;

use cutroom_core::types::DbId;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn upload(
    app: axum::Router,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = post_json_auth(app, "/api/v1/videos", token, body).await;
    let status = response.status();
    (status, body_json(response).await)
}

/// Poll the videos table until the status settles (the publish dispatch
/// runs on a background task).
async fn wait_for_status(pool: &PgPool, video_id: DbId, expected: &str) {
    for _ in 0..50 {
        let status: String = sqlx::query_scalar("SELECT status FROM videos WHERE id = $1")
            .bind(video_id)
            .fetch_one(pool)
            .await
            .unwrap();
        if status == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("video {video_id} never reached status '{expected}'");
}

// ---------------------------------------------------------------------------
// Upload and listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_upload_of_finished_edit_is_pending(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let app = common::build_test_app(pool);

    let (status, json) = upload(
        app,
        &token_for(creator, "creator"),
        serde_json::json!({
            "title": "My cut",
            "media_url": "https://cdn.test/v.mp4",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["creator_id"], creator);
    assert!(json["data"]["raw_media_url"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_validates_title_and_media_url(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let app = common::build_test_app(pool);
    let token = token_for(creator, "creator");

    let (status, _) = upload(
        app.clone(),
        &token,
        serde_json::json!({ "title": "", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = upload(
        app,
        &token,
        serde_json::json!({ "title": "ok", "media_url": "ftp://nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unlinked_editor_gets_an_empty_list_not_an_error(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let editor = create_user(&pool, "e@test.com", "editor", None).await;
    let app = common::build_test_app(pool);

    upload(
        app.clone(),
        &token_for(creator, "creator"),
        serde_json::json!({ "title": "t", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;

    let response = get_auth(app, "/api/v1/videos", &token_for(editor, "editor")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_endpoint_filters_by_status(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let app = common::build_test_app(pool);
    let token = token_for(creator, "creator");

    upload(
        app.clone(),
        &token,
        serde_json::json!({ "title": "edit", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;
    upload(
        app.clone(),
        &token,
        serde_json::json!({ "title": "raw", "media_url": "https://cdn.test/raw.mp4", "raw": true }),
    )
    .await;

    let json = body_json(get_auth(app, "/api/v1/videos/pending", &token).await).await;
    let videos = json["data"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["status"], "pending");
}

// ---------------------------------------------------------------------------
// Raw review
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn raw_review_accept_claims_and_is_idempotent(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let e1 = create_user(&pool, "e1@test.com", "editor", Some(creator)).await;
    let e2 = create_user(&pool, "e2@test.com", "editor", Some(creator)).await;
    let app = common::build_test_app(pool);

    let (_, json) = upload(
        app.clone(),
        &token_for(creator, "creator"),
        serde_json::json!({ "title": "raw", "media_url": "https://cdn.test/raw.mp4", "raw": true }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();

    let accept = serde_json::json!({ "action": "accept" });
    let uri = format!("/api/v1/videos/{id}/raw-review");

    let response = post_json_auth(app.clone(), &uri, &token_for(e1, "editor"), accept.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "editing_in_progress");
    assert_eq!(json["data"]["editor_id"], e1);

    // Re-accepting one's own claim is a no-op, not an error.
    let response = post_json_auth(app.clone(), &uri, &token_for(e1, "editor"), accept.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The claim closed the pool: the second editor can no longer see it.
    let response = post_json_auth(app, &uri, &token_for(e2, "editor"), accept).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn raw_review_reject_is_terminal(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let editor = create_user(&pool, "e@test.com", "editor", Some(creator)).await;
    let app = common::build_test_app(pool);

    let (_, json) = upload(
        app.clone(),
        &token_for(creator, "creator"),
        serde_json::json!({ "title": "raw", "media_url": "https://cdn.test/raw.mp4", "raw": true }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/videos/{id}/raw-review");
    let token = token_for(editor, "editor");

    let response = post_json_auth(
        app.clone(),
        &uri,
        &token,
        serde_json::json!({ "action": "reject", "reason": "unusable audio" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "raw_rejected");
    assert_eq!(json["data"]["editor_rejection_reason"], "unusable audio");

    // No way back from raw_rejected.
    let response = post_json_auth(app, &uri, &token, serde_json::json!({ "action": "accept" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creators_cannot_raw_review(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let app = common::build_test_app(pool);
    let token = token_for(creator, "creator");

    let (_, json) = upload(
        app.clone(),
        &token,
        serde_json::json!({ "title": "raw", "media_url": "https://cdn.test/raw.mp4", "raw": true }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/videos/{id}/raw-review"),
        &token,
        serde_json::json!({ "action": "accept" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Creator review and publish claim
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn approve_without_credentials_fails_the_precondition(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(creator, "creator");

    let (_, json) = upload(
        app.clone(),
        &token,
        serde_json::json!({ "title": "t", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/videos/{id}/approve"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PRECONDITION_FAILED");

    // No state change happened.
    let status: String = sqlx::query_scalar("SELECT status FROM videos WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approve_by_non_owner_is_forbidden(pool: PgPool) {
    let owner = create_user(&pool, "owner@test.com", "creator", None).await;
    let other = create_user(&pool, "other@test.com", "creator", None).await;
    connect_publish_credentials(&pool, owner).await;
    let app = common::build_test_app(pool.clone());

    let (_, json) = upload(
        app.clone(),
        &token_for(owner, "creator"),
        serde_json::json!({ "title": "t", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/videos/{id}/approve"),
        &token_for(other, "creator"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let status: String = sqlx::query_scalar("SELECT status FROM videos WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approve_publishes_through_the_dispatcher(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    connect_publish_credentials(&pool, creator).await;

    let publisher = StubPublisher::succeeding("yt-final");
    let (app, _dispatcher) =
        common::build_test_app_with_publisher(pool.clone(), publisher.clone());
    let token = token_for(creator, "creator");

    let (_, json) = upload(
        app.clone(),
        &token,
        serde_json::json!({ "title": "t", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/videos/{id}/approve"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "processing");

    wait_for_status(&pool, id, "uploaded").await;
    assert_eq!(publisher.call_count(), 1);

    let publish_id: Option<String> =
        sqlx::query_scalar("SELECT youtube_video_id FROM videos WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(publish_id.as_deref(), Some("yt-final"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_approves_dispatch_exactly_once(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    connect_publish_credentials(&pool, creator).await;

    let publisher = StubPublisher::succeeding("yt-once");
    let (app, _dispatcher) =
        common::build_test_app_with_publisher(pool.clone(), publisher.clone());
    let token = token_for(creator, "creator");

    let (_, json) = upload(
        app.clone(),
        &token,
        serde_json::json!({ "title": "t", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/videos/{id}/approve");

    let (r1, r2) = tokio::join!(
        post_json_auth(app.clone(), &uri, &token, serde_json::json!({})),
        post_json_auth(app.clone(), &uri, &token, serde_json::json!({})),
    );

    let mut statuses = [r1.status(), r2.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::ACCEPTED, StatusCode::CONFLICT]);

    wait_for_status(&pool, id, "uploaded").await;
    assert_eq!(publisher.call_count(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reject_then_resubmit_clears_the_reason(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let editor = create_user(&pool, "e@test.com", "editor", Some(creator)).await;
    let app = common::build_test_app(pool);
    let creator_token = token_for(creator, "creator");

    let (_, json) = upload(
        app.clone(),
        &creator_token,
        serde_json::json!({ "title": "t", "media_url": "https://cdn.test/v1.mp4" }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/videos/{id}/reject"),
        &creator_token,
        serde_json::json!({ "reason": "pacing is off" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "rejected");
    assert_eq!(json["data"]["rejection_reason"], "pacing is off");

    let response = post_json_auth(
        app,
        &format!("/api/v1/videos/{id}/edit"),
        &token_for(editor, "editor"),
        serde_json::json!({ "media_url": "https://cdn.test/v2.mp4" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert!(json["data"]["rejection_reason"].is_null());
    assert_eq!(json["data"]["editor_id"], editor);
}

// ---------------------------------------------------------------------------
// Metadata guards and deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn metadata_is_frozen_once_in_the_publish_pipeline(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(creator, "creator");

    let (_, json) = upload(
        app.clone(),
        &token,
        serde_json::json!({ "title": "t", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();

    sqlx::query("UPDATE videos SET status = 'processing' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/videos/{id}/thumbnail"),
        &token,
        serde_json::json!({ "thumbnail_url": "https://cdn.test/thumb.jpg" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(
        app,
        &format!("/api/v1/videos/{id}/edit-settings"),
        &token,
        serde_json::json!({ "title": "New title" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_for_me_hides_only_for_the_requester(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let editor = create_user(&pool, "e@test.com", "editor", Some(creator)).await;
    let app = common::build_test_app(pool);
    let creator_token = token_for(creator, "creator");
    let editor_token = token_for(editor, "editor");

    let (_, json) = upload(
        app.clone(),
        &creator_token,
        serde_json::json!({ "title": "t", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/videos/{id}?for=me");

    let response = delete_auth(app.clone(), &uri, &creator_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    // Deleting again is still a 204.
    let response = delete_auth(app.clone(), &uri, &creator_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Hidden for the creator, still there for the linked editor.
    let response = get_auth(app.clone(), &format!("/api/v1/videos/{id}"), &creator_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get_auth(app, &format!("/api/v1/videos/{id}"), &editor_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_for_everyone_is_owner_only(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let editor = create_user(&pool, "e@test.com", "editor", Some(creator)).await;
    let app = common::build_test_app(pool.clone());

    let (_, json) = upload(
        app.clone(),
        &token_for(creator, "creator"),
        serde_json::json!({ "title": "t", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/videos/{id}?for=everyone");

    let response = delete_auth(app.clone(), &uri, &token_for(editor, "editor")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app, &uri, &token_for(creator, "creator")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let gone: Option<i64> = sqlx::query_scalar("SELECT id FROM videos WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await
        .unwrap();
    assert!(gone.is_none());
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_thread_roundtrip(pool: PgPool) {
    let creator = create_user(&pool, "c@test.com", "creator", None).await;
    let editor = create_user(&pool, "e@test.com", "editor", Some(creator)).await;
    let app = common::build_test_app(pool);
    let creator_token = token_for(creator, "creator");

    let (_, json) = upload(
        app.clone(),
        &creator_token,
        serde_json::json!({ "title": "t", "media_url": "https://cdn.test/v.mp4" }),
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/videos/{id}/comments");

    let response = post_json_auth(
        app.clone(),
        &uri,
        &creator_token,
        serde_json::json!({ "body": "tighten the intro" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(
        app.clone(),
        &uri,
        &token_for(editor, "editor"),
        serde_json::json!({ "body": "will do" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get_auth(app, &uri, &creator_token).await).await;
    let comments = json["data"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["body"], "tighten the intro");
    assert_eq!(comments[1]["body"], "will do");
    assert_eq!(comments[1]["sender_id"], editor);
}
