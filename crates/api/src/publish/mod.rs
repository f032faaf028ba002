//! Video publishing: the [`VideoPublisher`] seam, the YouTube client,
//! and the background dispatcher that drives `processing` videos to a
//! terminal status.

pub mod dispatcher;
pub mod youtube;

pub use dispatcher::PublishDispatcher;
pub use youtube::YouTubePublisher;

use async_trait::async_trait;

/// Everything the publishing backend needs to upload one video.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub title: String,
    pub description: String,
    /// URL of the edited media file to upload.
    pub media_url: String,
    /// OAuth refresh token of the creator who owns the video.
    pub refresh_token: String,
}

/// Errors from the publishing backend.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The OAuth token exchange was rejected.
    #[error("token exchange failed ({status}): {body}")]
    TokenExchange { status: u16, body: String },

    /// The upload itself was rejected by the remote API.
    #[error("upload failed ({status}): {body}")]
    Upload { status: u16, body: String },

    /// The HTTP request failed before a response arrived (network, DNS, TLS).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote response was missing an expected field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Backend that actually uploads a video to the external platform.
///
/// The dispatcher only depends on this trait, so tests can inject a
/// stub and count calls.
#[async_trait]
pub trait VideoPublisher: Send + Sync {
    /// Upload the video and return the platform-assigned video id.
    async fn publish(&self, request: &PublishRequest) -> Result<String, PublishError>;
}
