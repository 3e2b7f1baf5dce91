//! Comments on board posts.

mod repository;
mod service;
mod types;

pub use repository::CommentRepository;
pub use service::CommentService;
pub use types::{Comment, CommentStatus, CommentView, MAX_COMMENT_LENGTH};
