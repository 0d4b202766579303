//! File-system storage backend
//!
//! Each database is stored as one JSON document, `<data_dir>/<name>.json`.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::storage::document::StoredDatabase;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::StorageBackend;

/// Extension of stored database documents
pub const DOCUMENT_EXTENSION: &str = "json";

/// File name of the document for a database
pub fn document_file_name(name: &str) -> String {
    format!("{}.{}", name, DOCUMENT_EXTENSION)
}

/// Stores databases as JSON files in one directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
    pretty: bool,
}

impl FileBackend {
    /// Create a backend rooted at `root`
    ///
    /// The directory is created on the first write if it does not exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pretty: false,
        }
    }

    /// Create a backend from the data directory and output settings in `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_dir.clone()).pretty(config.pretty)
    }

    /// Pretty-print written documents
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Path of the document for a database
    ///
    /// Rejects names that could escape the data directory.
    pub fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\', '\0'])
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(document_file_name(name)))
    }
}

impl StorageBackend for FileBackend {
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path_for(name)?.is_file())
    }

    fn read(&self, name: &str) -> Result<StoredDatabase> {
        let path = self.path_for(name)?;
        let bytes = fs::read(&path).map_err(|e| StorageError::from_read(e, path.clone()))?;
        debug!("Read {} bytes from {:?}", bytes.len(), path);
        Ok(StoredDatabase::from_json(&bytes)?)
    }

    fn write(&self, name: &str, document: &StoredDatabase) -> Result<()> {
        let path = self.path_for(name)?;
        let bytes = document.to_json(self.pretty)?;
        atomic_write(&path, &bytes)?;
        debug!("Wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Temp file sits next to the target so the rename stays on one filesystem
    let mut temp_name = path.file_name().map(OsString::from).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let result = write_synced(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced(path: &Path, data: &[u8]) -> StorageResult<()> {
    let mut file = File::create(path).map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;

    Ok(())
}
