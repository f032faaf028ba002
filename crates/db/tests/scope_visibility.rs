//! Integration tests for scoped video listing: workspace scopes, the
//! editor open pool, room scopes, and status filters.

mod common;

use sqlx::PgPool;

use cutroom_core::lifecycle::VideoStatus;
use cutroom_core::scope::{self, RequesterRole, RoomContext, ScopeRequest, VideoScope};
use cutroom_core::types::DbId;
use cutroom_db::repositories::{RoomRepo, VideoRepo};

use common::{create_creator, create_editor, upload_video};

fn creator_scope(creator_id: DbId) -> VideoScope {
    scope::resolve(ScopeRequest {
        user_id: creator_id,
        role: RequesterRole::Creator,
        linked_creator_id: None,
        room: None,
    })
}

fn linked_editor_scope(editor_id: DbId, creator_id: DbId) -> VideoScope {
    scope::resolve(ScopeRequest {
        user_id: editor_id,
        role: RequesterRole::Editor,
        linked_creator_id: Some(creator_id),
        room: None,
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_sees_only_their_workspace(pool: PgPool) {
    let c1 = create_creator(&pool, "c1@example.com").await;
    let c2 = create_creator(&pool, "c2@example.com").await;

    let mine = upload_video(&pool, c1, None, None, false).await;
    let theirs = upload_video(&pool, c2, None, None, false).await;

    let videos = VideoRepo::list_scoped(&pool, &creator_scope(c1), c1, None)
        .await
        .unwrap();

    let ids: Vec<_> = videos.iter().map(|v| v.id).collect();
    assert!(ids.contains(&mine.id));
    assert!(!ids.contains(&theirs.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn open_pool_closes_once_another_editor_claims(pool: PgPool) {
    let creator = create_creator(&pool, "c@example.com").await;
    let e1 = create_editor(&pool, "e1@example.com", Some(creator)).await;
    let e2 = create_editor(&pool, "e2@example.com", Some(creator)).await;

    let raw = upload_video(&pool, creator, None, None, true).await;

    // Unclaimed: both linked editors see it.
    for editor in [e1, e2] {
        let videos =
            VideoRepo::list_scoped(&pool, &linked_editor_scope(editor, creator), editor, None)
                .await
                .unwrap();
        assert!(videos.iter().any(|v| v.id == raw.id));
    }

    VideoRepo::claim_for_editing(&pool, raw.id, e1)
        .await
        .unwrap()
        .expect("claim succeeds");

    // Claimed by e1: e1 still sees it, e2 no longer does.
    let e1_videos = VideoRepo::list_scoped(&pool, &linked_editor_scope(e1, creator), e1, None)
        .await
        .unwrap();
    assert!(e1_videos.iter().any(|v| v.id == raw.id));

    let e2_videos = VideoRepo::list_scoped(&pool, &linked_editor_scope(e2, creator), e2, None)
        .await
        .unwrap();
    assert!(!e2_videos.iter().any(|v| v.id == raw.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn open_pool_in_a_room_closes_once_a_member_claims(pool: PgPool) {
    let owner = create_creator(&pool, "owner@example.com").await;
    let e1 = create_editor(&pool, "e1@example.com", None).await;
    let e2 = create_editor(&pool, "e2@example.com", None).await;

    let room = RoomRepo::create(&pool, owner, "Edit bay", "tok-1").await.unwrap();
    RoomRepo::add_member(&pool, room.id, owner).await.unwrap();
    RoomRepo::add_member(&pool, room.id, e1).await.unwrap();
    RoomRepo::add_member(&pool, room.id, e2).await.unwrap();

    let raw = upload_video(&pool, owner, None, Some(room.id), true).await;

    let member_scope = |editor: DbId| {
        scope::resolve(ScopeRequest {
            user_id: editor,
            role: RequesterRole::Editor,
            linked_creator_id: None,
            room: Some(RoomContext {
                room_id: room.id,
                is_owner: false,
                is_member: true,
            }),
        })
    };

    // Unclaimed: every member editor sees the room upload.
    for editor in [e1, e2] {
        let videos = VideoRepo::list_scoped(&pool, &member_scope(editor), editor, None)
            .await
            .unwrap();
        assert!(videos.iter().any(|v| v.id == raw.id));
    }

    VideoRepo::claim_for_editing(&pool, raw.id, e1)
        .await
        .unwrap()
        .expect("claim succeeds");

    // Claimed by e1: the pool is closed for e2 even inside the room.
    let e1_videos = VideoRepo::list_scoped(&pool, &member_scope(e1), e1, None)
        .await
        .unwrap();
    assert!(e1_videos.iter().any(|v| v.id == raw.id));

    let e2_videos = VideoRepo::list_scoped(&pool, &member_scope(e2), e2, None)
        .await
        .unwrap();
    assert!(!e2_videos.iter().any(|v| v.id == raw.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unlinked_editor_sees_nothing(pool: PgPool) {
    let creator = create_creator(&pool, "c@example.com").await;
    let editor = create_editor(&pool, "e@example.com", None).await;
    upload_video(&pool, creator, None, None, true).await;

    let scope = scope::resolve(ScopeRequest {
        user_id: editor,
        role: RequesterRole::Editor,
        linked_creator_id: None,
        room: None,
    });
    assert!(scope.is_empty());

    let videos = VideoRepo::list_scoped(&pool, &scope, editor, None).await.unwrap();
    assert!(videos.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn room_scope_includes_other_creators_uploads(pool: PgPool) {
    let owner = create_creator(&pool, "owner@example.com").await;
    let guest = create_creator(&pool, "guest@example.com").await;

    let room = RoomRepo::create(&pool, owner, "Edit bay", "tok-1").await.unwrap();
    RoomRepo::add_member(&pool, room.id, owner).await.unwrap();
    RoomRepo::add_member(&pool, room.id, guest).await.unwrap();

    let in_room = upload_video(&pool, guest, None, Some(room.id), false).await;
    let outside = upload_video(&pool, guest, None, None, false).await;

    let scope = scope::resolve(ScopeRequest {
        user_id: owner,
        role: RequesterRole::Creator,
        linked_creator_id: None,
        room: Some(RoomContext {
            room_id: room.id,
            is_owner: true,
            is_member: true,
        }),
    });

    let videos = VideoRepo::list_scoped(&pool, &scope, owner, None).await.unwrap();
    let ids: Vec<_> = videos.iter().map(|v| v.id).collect();
    assert!(ids.contains(&in_room.id));
    assert!(!ids.contains(&outside.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_filter_narrows_the_listing(pool: PgPool) {
    let creator = create_creator(&pool, "c@example.com").await;

    let pending = upload_video(&pool, creator, None, None, false).await;
    let raw = upload_video(&pool, creator, None, None, true).await;

    let videos = VideoRepo::list_scoped(
        &pool,
        &creator_scope(creator),
        creator,
        Some(VideoStatus::Pending),
    )
    .await
    .unwrap();

    let ids: Vec<_> = videos.iter().map(|v| v.id).collect();
    assert!(ids.contains(&pending.id));
    assert!(!ids.contains(&raw.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_deleted_videos_are_excluded_from_listings(pool: PgPool) {
    let creator = create_creator(&pool, "c@example.com").await;
    let video = upload_video(&pool, creator, None, None, false).await;

    VideoRepo::soft_delete_for(&pool, video.id, creator).await.unwrap();

    let videos = VideoRepo::list_scoped(&pool, &creator_scope(creator), creator, None)
        .await
        .unwrap();
    assert!(!videos.iter().any(|v| v.id == video.id));
}
