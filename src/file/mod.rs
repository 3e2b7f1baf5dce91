//! Board attachments.
//!
//! - Validation and date-partitioned storage of uploads
//! - Attachment metadata rows
//! - Downloads with a per-file counter

mod metadata;
mod service;
mod storage;

pub use metadata::{format_file_size, BoardFile, BoardFileRepository, FileType, NewBoardFile};
pub use service::{DownloadResult, FileService};
pub use storage::{file_extension, FileStorage, StoredFile, Upload};

/// Storage subdirectory for board attachments.
pub const BOARD_SUBDIR: &str = "boards";
