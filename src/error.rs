//! Error types for the library board.

use thiserror::Error;

/// Common error type for the library board.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Uploaded file rejected before storage.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// Unique constraint clash (e.g. an email already registered).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for LibraryError {
    fn from(e: sqlx::Error) -> Self {
        LibraryError::Database(e.to_string())
    }
}

/// Result type alias for library board operations.
pub type Result<T> = std::result::Result<T, LibraryError>;
