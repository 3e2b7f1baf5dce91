//! Data transfer objects for the web API.

pub mod request;
pub mod response;
pub mod validation;

pub use request::*;
pub use response::*;
pub use validation::{no_control_chars, not_empty_trimmed, sanitize_string, ValidatedJson};
