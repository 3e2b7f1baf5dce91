//! Physical storage of board attachments.
//!
//! Files live under date-partitioned directories below the upload root:
//! ```text
//! {upload_dir}/
//! └── boards/
//!     └── 2024/
//!         └── 03/
//!             └── 15/
//!                 └── 0b7c5a1e-5c1d-4a64-9f0e-8a1f3d2c9b44.pdf
//! ```
//! The relative directory (`boards/2024/03/15`) and the stored name are
//! recorded on the attachment row.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::FilesConfig;
use crate::{LibraryError, Result};

/// An uploaded file held in memory before it is stored.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Name supplied by the client.
    pub filename: String,
    /// MIME type supplied by the client, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// MIME type to record: the client's value, else a guess from the name.
    pub fn mime_type(&self) -> String {
        match self.content_type.as_deref() {
            Some(ct) if !ct.trim().is_empty() => ct.to_string(),
            _ => mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .to_string(),
        }
    }
}

/// Where a file ended up after [`FileStorage::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// `<uuid>.<ext>`
    pub stored_name: String,
    /// Directory relative to the upload root, `/`-separated.
    pub relative_path: String,
}

/// File storage service for managing attachment files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
    max_file_size: u64,
    allowed_extensions: Vec<String>,
}

impl FileStorage {
    /// Create a storage rooted at the configured upload directory.
    ///
    /// The root directory is created if it doesn't exist.
    pub fn new(config: &FilesConfig) -> Result<Self> {
        let base_path = PathBuf::from(&config.upload_dir);
        fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            max_file_size: config.max_file_size,
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .collect(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Check an upload before anything is written.
    ///
    /// Checks run in order: non-empty, size ceiling, name present, extension
    /// present, extension allowed.
    pub fn validate(&self, original_name: &str, size: u64) -> Result<()> {
        if size == 0 {
            return Err(LibraryError::InvalidFile("file is empty".to_string()));
        }
        if size > self.max_file_size {
            return Err(LibraryError::InvalidFile(format!(
                "file size {} exceeds the limit of {} bytes",
                size, self.max_file_size
            )));
        }
        if original_name.trim().is_empty() {
            return Err(LibraryError::InvalidFile("file name is missing".to_string()));
        }

        let ext = file_extension(original_name);
        if ext.is_empty() {
            return Err(LibraryError::InvalidFile(
                "file has no extension".to_string(),
            ));
        }
        if !self.allowed_extensions.iter().any(|allowed| *allowed == ext) {
            return Err(LibraryError::InvalidFile(format!(
                "extension '{ext}' is not allowed"
            )));
        }

        Ok(())
    }

    /// Validate and write an upload under `{subdir}/YYYY/MM/DD/` for today.
    pub fn store(&self, upload: &Upload, subdir: &str) -> Result<StoredFile> {
        self.store_on(upload, subdir, Local::now().date_naive())
    }

    /// Same as [`store`](Self::store) with an explicit partition date.
    pub fn store_on(&self, upload: &Upload, subdir: &str, date: NaiveDate) -> Result<StoredFile> {
        self.validate(&upload.filename, upload.size())?;

        let stored_name = generate_stored_name(&upload.filename);
        let relative_path = format!(
            "{}/{:04}/{:02}/{:02}",
            subdir.trim_matches('/'),
            date.year(),
            date.month(),
            date.day()
        );

        let dir = self.dir_path(&relative_path);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(&stored_name), &upload.bytes)?;

        debug!(
            original = %upload.filename,
            stored = %stored_name,
            path = %relative_path,
            size = upload.size(),
            "Stored upload"
        );

        Ok(StoredFile {
            stored_name,
            relative_path,
        })
    }

    /// Read a stored file.
    pub fn load(&self, relative_path: &str, stored_name: &str) -> Result<Vec<u8>> {
        let file_path = self.file_path(relative_path, stored_name);

        match fs::read(&file_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(LibraryError::NotFound(format!("file {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a stored file. Failures are logged, never returned.
    ///
    /// Returns `true` if a file was removed.
    pub fn delete(&self, relative_path: &str, stored_name: &str) -> bool {
        let file_path = self.file_path(relative_path, stored_name);

        match fs::remove_file(&file_path) {
            Ok(()) => {
                debug!(path = %file_path.display(), "Deleted stored file");
                true
            }
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "Failed to delete stored file");
                false
            }
        }
    }

    pub fn exists(&self, relative_path: &str, stored_name: &str) -> bool {
        self.file_path(relative_path, stored_name).is_file()
    }

    /// Full path of a stored file.
    pub fn file_path(&self, relative_path: &str, stored_name: &str) -> PathBuf {
        self.dir_path(relative_path).join(stored_name)
    }

    fn dir_path(&self, relative_path: &str) -> PathBuf {
        relative_path
            .split('/')
            .filter(|part| !part.is_empty() && *part != "." && *part != "..")
            .fold(self.base_path.clone(), |path, part| path.join(part))
    }
}

/// Extension after the last dot, lowercased.
///
/// Empty if there is no dot or the dot is the last character.
///
/// ```
/// use library_board::file::file_extension;
///
/// assert_eq!(file_extension("Report.PDF"), "pdf");
/// assert_eq!(file_extension("archive.tar.gz"), "gz");
/// assert_eq!(file_extension("README"), "");
/// assert_eq!(file_extension("trailing."), "");
/// ```
pub fn file_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => name[idx + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// `<uuid-v4>.<ext>`, keeping the extension's original case.
fn generate_stored_name(original_name: &str) -> String {
    let uuid = Uuid::new_v4();
    match original_name.rfind('.') {
        Some(idx) if idx + 1 < original_name.len() => {
            format!("{uuid}.{}", &original_name[idx + 1..])
        }
        _ => uuid.to_string(),
    }
}
