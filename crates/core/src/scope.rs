//! Role-based visibility resolution for video queries.
//!
//! [`resolve`] is a pure function: the caller gathers the room membership
//! facts from the database, and the policy lives here where it can be tested
//! without I/O. Resolution never fails — the worst case is an empty scope,
//! which the repository layer turns into an empty result set.
//!
//! Open-pool policy: within a room, a video with no assigned editor is
//! visible to (and claimable by) every editor in that room until one claims
//! it. This is deliberate, not an artifact of the query shape.

use crate::types::DbId;

/// The requesting user's role, as resolved from their JWT claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequesterRole {
    Admin,
    Creator,
    Editor,
}

/// Room facts gathered by the caller for a `?room_id=` query.
#[derive(Debug, Clone, Copy)]
pub struct RoomContext {
    pub room_id: DbId,
    /// The requester owns the room.
    pub is_owner: bool,
    /// The requester is a member of the room.
    pub is_member: bool,
}

/// Inputs to scope resolution.
#[derive(Debug, Clone, Copy)]
pub struct ScopeRequest {
    pub user_id: DbId,
    pub role: RequesterRole,
    /// For editors: the creator they are directly linked to, if any.
    pub linked_creator_id: Option<DbId>,
    /// The room the requester is viewing, if any.
    pub room: Option<RoomContext>,
}

/// Filter descriptor consumed by the video record store.
///
/// Field semantics when building the query:
/// - `creator_scope_id` — restrict to `creator_id = X`.
/// - `editor_scope_id` — restrict to `editor_id = X OR editor_id IS NULL`
///   (the open pool).
/// - `room_id` — restrict to `room_id = X`.
///
/// All-`None` with `unrestricted = false` means "see nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoScope {
    pub creator_scope_id: Option<DbId>,
    pub editor_scope_id: Option<DbId>,
    pub room_id: Option<DbId>,
    /// Admins bypass scoping entirely.
    pub unrestricted: bool,
}

impl VideoScope {
    /// A scope that matches nothing.
    pub fn empty() -> Self {
        Self {
            creator_scope_id: None,
            editor_scope_id: None,
            room_id: None,
            unrestricted: false,
        }
    }

    /// Whether this scope can never match any video.
    pub fn is_empty(&self) -> bool {
        !self.unrestricted
            && self.creator_scope_id.is_none()
            && self.editor_scope_id.is_none()
            && self.room_id.is_none()
    }
}

/// Resolve the effective visibility scope for a video query or mutation.
pub fn resolve(req: ScopeRequest) -> VideoScope {
    match req.role {
        RequesterRole::Admin => VideoScope {
            creator_scope_id: None,
            editor_scope_id: None,
            room_id: None,
            unrestricted: true,
        },

        RequesterRole::Creator => match req.room {
            // A creator viewing a room they own or belong to sees every
            // video in that room, including other creators' uploads.
            Some(rc) if rc.is_owner || rc.is_member => VideoScope {
                creator_scope_id: None,
                editor_scope_id: None,
                room_id: Some(rc.room_id),
                unrestricted: false,
            },
            // Not a member of the requested room: nothing, not an error.
            Some(_) => VideoScope::empty(),
            // No room context: own workspace only.
            None => VideoScope {
                creator_scope_id: Some(req.user_id),
                editor_scope_id: None,
                room_id: None,
                unrestricted: false,
            },
        },

        RequesterRole::Editor => match req.room {
            // Room editors see videos assigned to them or unassigned.
            Some(rc) if rc.is_member => VideoScope {
                creator_scope_id: None,
                editor_scope_id: Some(req.user_id),
                room_id: Some(rc.room_id),
                unrestricted: false,
            },
            Some(_) => VideoScope::empty(),
            // No room: fall back to the direct creator link, same open-pool
            // semantics within that creator's workspace.
            None => match req.linked_creator_id {
                Some(creator_id) => VideoScope {
                    creator_scope_id: Some(creator_id),
                    editor_scope_id: Some(req.user_id),
                    room_id: None,
                    unrestricted: false,
                },
                None => VideoScope::empty(),
            },
        },
    }
}
