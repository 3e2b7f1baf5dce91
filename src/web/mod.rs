//! Web API.
//!
//! JSON over HTTP with JWT bearer authentication. Board forms are
//! multipart so that attachments travel with the post.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_router, ApiDoc};
pub use server::WebServer;
