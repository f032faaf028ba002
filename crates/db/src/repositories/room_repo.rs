//! Repository for the `rooms` and `room_members` tables.

use sqlx::PgPool;

use cutroom_core::types::DbId;

use crate::models::room::{Room, RoomMemberInfo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, invite_token, created_at, updated_at";

/// Provides CRUD operations for rooms and their membership.
pub struct RoomRepo;

impl RoomRepo {
    /// Insert a new room with a pre-generated invite token.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        name: &str,
        invite_token: &str,
    ) -> Result<Room, sqlx::Error> {
        let query = format!(
            "INSERT INTO rooms (owner_id, name, invite_token)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(owner_id)
            .bind(name)
            .bind(invite_token)
            .fetch_one(pool)
            .await
    }

    /// Find a room by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a room by its invite token.
    pub async fn find_by_invite_token(
        pool: &PgPool,
        invite_token: &str,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE invite_token = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(invite_token)
            .fetch_optional(pool)
            .await
    }

    /// Add a user to a room. Idempotent: returns `false` when the user was
    /// already a member.
    pub async fn add_member(
        pool: &PgPool,
        room_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO room_members (room_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (room_id, user_id) DO NOTHING",
        )
        .bind(room_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the user is a member of the room.
    pub async fn is_member(pool: &PgPool, room_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM room_members WHERE room_id = $1 AND user_id = $2
             )",
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// List room members with display data, oldest member first.
    pub async fn list_members(
        pool: &PgPool,
        room_id: DbId,
    ) -> Result<Vec<RoomMemberInfo>, sqlx::Error> {
        sqlx::query_as::<_, RoomMemberInfo>(
            "SELECT m.user_id, u.email, u.role, m.joined_at
             FROM room_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.room_id = $1
             ORDER BY m.joined_at ASC",
        )
        .bind(room_id)
        .fetch_all(pool)
        .await
    }

    /// List rooms the user owns or belongs to, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms
             WHERE owner_id = $1
                OR id IN (SELECT room_id FROM room_members WHERE user_id = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
