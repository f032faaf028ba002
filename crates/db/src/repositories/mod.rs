//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod room_repo;
pub mod session_repo;
pub mod user_repo;
pub mod video_repo;

pub use comment_repo::CommentRepo;
pub use room_repo::RoomRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use video_repo::VideoRepo;
