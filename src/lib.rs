//! Library board
//!
//! Member registration, a categorized discussion board with attachments,
//! and comments, served as a JSON API over HTTP.

pub mod auth;
pub mod board;
pub mod comment;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{
    authenticate, change_status, hash_password, mask_email, register, register_with_role,
    validate_password, verify_password, PasswordError, RegistrationError, RegistrationRequest,
    ValidationError,
};
pub use board::{BoardCategory, BoardService, PageRequest};
pub use comment::CommentService;
pub use config::Config;
pub use db::{Database, Member, MemberRepository, MemberStatus, MemberType, NewMember, Role};
pub use error::{LibraryError, Result};
pub use file::{FileService, FileStorage, Upload};
pub use web::WebServer;
