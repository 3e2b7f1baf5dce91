//! Attachment download service.

use tracing::{debug, info};

use crate::db::Database;
use crate::{LibraryError, Result};

use super::metadata::{BoardFile, BoardFileRepository};
use super::storage::FileStorage;

/// Result of a file download.
#[derive(Debug)]
pub struct DownloadResult {
    /// Attachment row, with the counter already incremented.
    pub file: BoardFile,
    pub content: Vec<u8>,
}

/// File service for attachment downloads.
pub struct FileService<'a> {
    db: &'a Database,
    storage: &'a FileStorage,
}

impl<'a> FileService<'a> {
    pub fn new(db: &'a Database, storage: &'a FileStorage) -> Self {
        Self { db, storage }
    }

    /// Read an attachment and count the download.
    ///
    /// The counter update is rolled back when the stored file cannot be
    /// read.
    pub async fn download(&self, file_id: i64) -> Result<DownloadResult> {
        let mut tx = self.db.begin().await?;

        let mut file = BoardFileRepository::get_by_id(&mut tx, file_id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("file".to_string()))?;

        BoardFileRepository::increment_download(&mut tx, file_id).await?;
        let content = self.storage.load(&file.file_path, &file.stored_filename)?;

        tx.commit().await?;
        file.download_count += 1;

        debug!(file_id, size = content.len(), "Attachment read");
        info!(
            file_id,
            board_id = file.board_id,
            downloads = file.download_count,
            "File downloaded"
        );

        Ok(DownloadResult { file, content })
    }
}
