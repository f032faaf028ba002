//! Periodic recovery of stranded publish jobs.
//!
//! A crash between the `pending -> processing` claim and the dispatcher's
//! completion leaves a video stuck in `processing` forever. This job claims
//! rows that have sat in `processing` past a staleness threshold and
//! re-dispatches them; the claim bumps `updated_at`, so a row is handed
//! out at most once per staleness window even across overlapping sweeps.
//! Runs on a fixed interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use cutroom_db::repositories::VideoRepo;
use cutroom_db::DbPool;

use crate::publish::PublishDispatcher;

/// Default sweep interval: 5 minutes.
const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Default staleness threshold: 15 minutes in `processing`.
const DEFAULT_STALE_AFTER_SECS: i64 = 900;

/// Run the publish recovery loop.
///
/// Re-dispatches videos stuck in `processing` longer than
/// `PUBLISH_STALE_AFTER_SECS` (defaults to 15 minutes), checking every
/// `PUBLISH_RECOVERY_INTERVAL_SECS` (defaults to 5 minutes). Runs until
/// `cancel` is triggered.
pub async fn run(pool: DbPool, dispatcher: Arc<PublishDispatcher>, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("PUBLISH_RECOVERY_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);
    let stale_after_secs: i64 = std::env::var("PUBLISH_STALE_AFTER_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_STALE_AFTER_SECS);

    tracing::info!(
        interval_secs,
        stale_after_secs,
        "Publish recovery job started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Publish recovery job stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::seconds(stale_after_secs);
                match VideoRepo::claim_stale_processing(&pool, cutoff).await {
                    Ok(videos) if videos.is_empty() => {
                        tracing::debug!("Publish recovery: no stale videos");
                    }
                    Ok(videos) => {
                        tracing::info!(count = videos.len(), "Publish recovery: re-dispatching stale videos");
                        for video in videos {
                            dispatcher.spawn(video);
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Publish recovery: scan failed");
                    }
                }
            }
        }
    }
}
