//! Domain error taxonomy.
//!
//! [`CoreError`] is the single error type produced by domain logic. The API
//! layer maps each variant to an HTTP status and a structured JSON body.

use crate::types::DbId;

/// Domain-level error shared across all crates.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation is not valid in the entity's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A required precondition was not met (e.g. approving a video whose
    /// creator has no stored publish credentials). No state was changed.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
