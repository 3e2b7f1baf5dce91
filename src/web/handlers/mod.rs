//! API handlers.

pub mod auth;
pub mod board;
pub mod comment;
pub mod file;
pub mod home;

pub use auth::{check_email, login, logout, me, refresh, register, AppState};
pub use board::{
    create_board, delete_board, edit_board, get_board, list_boards, list_categories,
    update_board,
};
pub use comment::{create_comment, delete_comment, list_comments, update_comment};
pub use file::{content_disposition_header, download_file};
pub use home::{health, home};
