//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts (where the handler accepts one)
//! - Targeted input structs for partial mutations

pub mod comment;
pub mod room;
pub mod session;
pub mod user;
pub mod video;
