//! Discussion board.
//!
//! - Posts with categories and soft delete
//! - Paginated listing with a 10-page navigation window
//! - Attachments stored alongside each post
//! - Author-only editing and deletion

mod pagination;
mod repository;
mod service;
mod types;

pub use pagination::{
    Page, PageRequest, PageWindow, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PAGE_GROUP_SIZE,
};
pub use repository::BoardRepository;
pub use service::{BoardDetail, BoardService};
pub use types::{
    Board, BoardCategory, BoardStatus, BoardSummary, BoardUpdate, NewBoard, MAX_TITLE_LENGTH,
};
