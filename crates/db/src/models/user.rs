//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cutroom_core::types::{DbId, Timestamp};

/// A user row from the `users` table.
///
/// Credential material (`password_hash`, publish tokens) never leaves the
/// server; those fields are skipped on serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
    /// For editors: the creator whose workspace they are linked to.
    pub creator_id: Option<DbId>,

    pub plan: String,
    pub subscription_status: String,
    pub subscription_ends_at: Option<Timestamp>,

    #[serde(skip_serializing)]
    pub yt_access_token: Option<String>,
    #[serde(skip_serializing)]
    pub yt_refresh_token: Option<String>,
    pub yt_tokens_updated_at: Option<Timestamp>,

    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Whether this user holds a usable external publish credential.
    ///
    /// A refresh token is the durable credential; access tokens expire and
    /// are re-derived from it at publish time.
    pub fn has_publish_credentials(&self) -> bool {
        self.yt_refresh_token.is_some()
    }
}

/// Input for inserting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub creator_id: Option<DbId>,
}

/// Request body for storing/refreshing the publish credential bundle.
#[derive(Debug, Deserialize)]
pub struct UpdatePublishCredentials {
    pub access_token: String,
    pub refresh_token: String,
}
