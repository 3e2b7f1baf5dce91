//! Attachment metadata and repository.
//!
//! Repository functions take a connection so they can run inside the
//! transaction of the board operation that owns them.

use sqlx::SqliteConnection;

use crate::Result;

/// Coarse file category derived from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Image,
    Pdf,
    Document,
    Excel,
    PowerPoint,
    Archive,
    Text,
    Default,
}

impl FileType {
    /// Classify a lowercase extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" => FileType::Image,
            "pdf" => FileType::Pdf,
            "doc" | "docx" | "hwp" => FileType::Document,
            "xls" | "xlsx" => FileType::Excel,
            "ppt" | "pptx" => FileType::PowerPoint,
            "zip" | "rar" => FileType::Archive,
            "txt" => FileType::Text,
            _ => FileType::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Pdf => "pdf",
            FileType::Document => "document",
            FileType::Excel => "excel",
            FileType::PowerPoint => "powerpoint",
            FileType::Archive => "archive",
            FileType::Text => "text",
            FileType::Default => "default",
        }
    }

    /// Font Awesome icon class for the type.
    pub fn icon_class(&self) -> &'static str {
        match self {
            FileType::Image => "fa-file-image",
            FileType::Pdf => "fa-file-pdf",
            FileType::Document => "fa-file-word",
            FileType::Excel => "fa-file-excel",
            FileType::PowerPoint => "fa-file-powerpoint",
            FileType::Archive => "fa-file-archive",
            FileType::Text => "fa-file-alt",
            FileType::Default => "fa-file",
        }
    }
}

/// Human-readable size: bytes as-is, larger units with one decimal.
///
/// ```
/// use library_board::file::format_file_size;
///
/// assert_eq!(format_file_size(512), "512 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(10 * 1024 * 1024), "10.0 MB");
/// ```
pub fn format_file_size(bytes: i64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let size = bytes as f64;
    if size < KB {
        format!("{bytes} B")
    } else if size < MB {
        format!("{:.1} KB", size / KB)
    } else if size < GB {
        format!("{:.1} MB", size / MB)
    } else {
        format!("{:.1} GB", size / GB)
    }
}

/// A file attached to a board post.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BoardFile {
    pub id: i64,
    pub board_id: i64,
    /// Name supplied at upload time.
    pub original_filename: String,
    /// `<uuid>.<ext>` on disk.
    pub stored_filename: String,
    /// Directory relative to the upload root.
    pub file_path: String,
    pub file_size: i64,
    pub file_extension: String,
    pub mime_type: String,
    pub download_count: i64,
    pub created_at: String,
}

impl BoardFile {
    pub fn file_type(&self) -> FileType {
        FileType::from_extension(&self.file_extension)
    }

    pub fn icon_class(&self) -> &'static str {
        self.file_type().icon_class()
    }

    pub fn formatted_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Data for recording a stored attachment.
#[derive(Debug, Clone)]
pub struct NewBoardFile {
    pub board_id: i64,
    pub original_filename: String,
    pub stored_filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_extension: String,
    pub mime_type: String,
}

const FILE_COLUMNS: &str = "id, board_id, original_filename, stored_filename, file_path, \
                            file_size, file_extension, mime_type, download_count, created_at";

/// Repository for attachment rows.
pub struct BoardFileRepository;

impl BoardFileRepository {
    /// Insert an attachment row and return it.
    pub async fn create(conn: &mut SqliteConnection, file: &NewBoardFile) -> Result<BoardFile> {
        let sql = format!(
            "INSERT INTO board_files (board_id, original_filename, stored_filename, file_path,
                                      file_size, file_extension, mime_type)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {FILE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, BoardFile>(&sql)
            .bind(file.board_id)
            .bind(&file.original_filename)
            .bind(&file.stored_filename)
            .bind(&file.file_path)
            .bind(file.file_size)
            .bind(&file.file_extension)
            .bind(&file.mime_type)
            .fetch_one(&mut *conn)
            .await?;
        Ok(created)
    }

    pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<BoardFile>> {
        let sql = format!("SELECT {FILE_COLUMNS} FROM board_files WHERE id = ?");
        let file = sqlx::query_as::<_, BoardFile>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(file)
    }

    /// Attachments of a board in upload order.
    pub async fn list_by_board(
        conn: &mut SqliteConnection,
        board_id: i64,
    ) -> Result<Vec<BoardFile>> {
        let sql = format!("SELECT {FILE_COLUMNS} FROM board_files WHERE board_id = ? ORDER BY id");
        let files = sqlx::query_as::<_, BoardFile>(&sql)
            .bind(board_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(files)
    }

    /// Delete an attachment only if it belongs to `board_id`.
    ///
    /// Returns the removed row so the caller can drop the stored file.
    pub async fn delete_for_board(
        conn: &mut SqliteConnection,
        board_id: i64,
        id: i64,
    ) -> Result<Option<BoardFile>> {
        let sql = format!(
            "DELETE FROM board_files WHERE id = ? AND board_id = ? RETURNING {FILE_COLUMNS}"
        );
        let removed = sqlx::query_as::<_, BoardFile>(&sql)
            .bind(id)
            .bind(board_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(removed)
    }

    /// Bump the download counter. Returns false if the row is gone.
    pub async fn increment_download(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let result =
            sqlx::query("UPDATE board_files SET download_count = download_count + 1 WHERE id = ?")
                .bind(id)
                .execute(&mut *conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
