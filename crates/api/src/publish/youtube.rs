//! YouTube Data API publishing backend.
//!
//! Exchanges the creator's stored OAuth refresh token for an access
//! token, then streams the edited media file into the resumable-free
//! multipart upload endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::YouTubeConfig;

use super::{PublishError, PublishRequest, VideoPublisher};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/youtube/v3/videos?part=snippet,status&uploadType=multipart";

/// Publishing backend that talks to the YouTube Data API v3.
pub struct YouTubePublisher {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

impl YouTubePublisher {
    pub fn new(config: &YouTubeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    /// Exchange a refresh token for a short-lived access token.
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<String, PublishError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self.client.post(TOKEN_URL).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PublishError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Stream the media file from its URL without buffering it in memory.
    async fn fetch_media(&self, media_url: &str) -> Result<reqwest::Body, PublishError> {
        let response = self.client.get(media_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PublishError::Upload {
                status: status.as_u16(),
                body,
            });
        }

        Ok(reqwest::Body::wrap_stream(response.bytes_stream()))
    }
}

#[async_trait]
impl VideoPublisher for YouTubePublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<String, PublishError> {
        let access_token = self.exchange_refresh_token(&request.refresh_token).await?;

        let metadata = serde_json::json!({
            "snippet": {
                "title": request.title,
                "description": request.description,
            },
            "status": {
                "privacyStatus": "private",
            },
        });

        let media = self.fetch_media(&request.media_url).await?;

        let form = reqwest::multipart::Form::new()
            .part(
                "snippet",
                reqwest::multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")?,
            )
            .part(
                "media",
                reqwest::multipart::Part::stream(media).mime_str("video/*")?,
            );

        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(&access_token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PublishError::Upload {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| PublishError::MalformedResponse(e.to_string()))?;

        Ok(uploaded.id)
    }
}
