//! Room (shared workspace) models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cutroom_core::types::{DbId, Timestamp};

/// A room row from the `rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub invite_token: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /rooms`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoom {
    pub name: String,
}

/// Request body for `POST /rooms/join`.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRoom {
    pub invite_token: String,
}

/// A room member with display data joined from `users`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoomMemberInfo {
    pub user_id: DbId,
    pub email: String,
    pub role: String,
    pub joined_at: Timestamp,
}
