//! Background dispatcher that drives a claimed (`processing`) video to
//! its terminal publish status.
//!
//! A video only reaches the dispatcher through the atomic
//! `pending -> processing` claim, so each approval produces exactly one
//! dispatch even under concurrent approve requests.

use std::sync::Arc;

use cutroom_db::models::video::Video;
use cutroom_db::repositories::{UserRepo, VideoRepo};
use cutroom_db::DbPool;
use cutroom_events::{EventBus, LifecycleEvent};

use super::{PublishRequest, VideoPublisher};

/// Executes publish jobs for claimed videos and records the outcome.
pub struct PublishDispatcher {
    pool: DbPool,
    publisher: Arc<dyn VideoPublisher>,
    bus: Arc<EventBus>,
}

impl PublishDispatcher {
    pub fn new(pool: DbPool, publisher: Arc<dyn VideoPublisher>, bus: Arc<EventBus>) -> Self {
        Self {
            pool,
            publisher,
            bus,
        }
    }

    /// Run the publish job on a background task.
    ///
    /// The `video` must already be in `processing`. The HTTP response does
    /// not wait for the upload; the outcome arrives as an event.
    pub fn spawn(self: &Arc<Self>, video: Video) {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            dispatcher.dispatch(video).await;
        });
    }

    /// Upload the video and move it to `uploaded` or `upload_failed`.
    pub async fn dispatch(&self, video: Video) {
        tracing::info!(video_id = video.id, "dispatching video for publish");

        match self.try_publish(&video).await {
            Ok(external_id) => self.record_success(&video, &external_id).await,
            Err(message) => self.record_failure(&video, &message).await,
        }
    }

    async fn try_publish(&self, video: &Video) -> Result<String, String> {
        let creator = UserRepo::find_by_id(&self.pool, video.creator_id)
            .await
            .map_err(|e| format!("failed to load creator: {e}"))?
            .ok_or_else(|| format!("creator {} not found", video.creator_id))?;

        let refresh_token = creator
            .yt_refresh_token
            .ok_or_else(|| "creator has no publish credentials".to_string())?;

        let request = PublishRequest {
            title: video.title.clone(),
            description: video.description.clone(),
            media_url: video.media_url.clone(),
            refresh_token,
        };

        self.publisher
            .publish(&request)
            .await
            .map_err(|e| e.to_string())
    }

    async fn record_success(&self, video: &Video, external_id: &str) {
        match VideoRepo::mark_uploaded(&self.pool, video.id, external_id).await {
            Ok(Some(updated)) => {
                tracing::info!(video_id = video.id, external_id, "video published");
                self.bus.publish(
                    LifecycleEvent::for_video("video.uploaded", updated.id, updated.room_id)
                        .with_payload(serde_json::json!({
                            "status": updated.status,
                            "youtube_video_id": updated.youtube_video_id,
                        })),
                );
            }
            Ok(None) => {
                // The row left `processing` under us (e.g. a concurrent
                // recovery sweep finished first). The upload already
                // happened; log it so the duplicate can be reconciled.
                tracing::warn!(
                    video_id = video.id,
                    external_id,
                    "publish succeeded but video was no longer in processing"
                );
            }
            Err(e) => {
                tracing::error!(video_id = video.id, error = %e, "failed to record publish success");
            }
        }
    }

    async fn record_failure(&self, video: &Video, message: &str) {
        tracing::warn!(video_id = video.id, error = %message, "publish failed");

        match VideoRepo::mark_upload_failed(&self.pool, video.id).await {
            Ok(Some(updated)) => {
                self.bus.publish(
                    LifecycleEvent::for_video("video.upload_failed", updated.id, updated.room_id)
                        .with_payload(serde_json::json!({
                            "status": updated.status,
                            "message": message,
                        })),
                );
            }
            Ok(None) => {
                tracing::warn!(
                    video_id = video.id,
                    "publish failed but video was no longer in processing"
                );
            }
            Err(e) => {
                tracing::error!(video_id = video.id, error = %e, "failed to record publish failure");
            }
        }
    }
}
