//! Storage layer
//!
//! Persists a database as one structured document holding every table.
//!
//! ## Architecture
//!
//! - **Backend**: Reads and writes whole documents by database name
//! - **Codec**: Pure conversion between in-memory tables and the document
//!
//! The engine never deals with paths or directories; that is the file
//! backend's concern.

pub mod codec;
pub mod document;
pub mod error;
pub mod file;
pub mod memory;

pub use codec::DecodeError;
pub use document::{StoredDatabase, StoredTable};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;

use crate::error::Result;

/// Reads and writes whole database documents by name
pub trait StorageBackend {
    /// Whether a database with this name is stored
    fn exists(&self, name: &str) -> Result<bool>;

    /// Read the stored document
    ///
    /// Fails if the database does not exist or the document is corrupt.
    fn read(&self, name: &str) -> Result<StoredDatabase>;

    /// Replace the stored document
    ///
    /// A concurrent reader sees either the previous or the new document,
    /// never a partial one.
    fn write(&self, name: &str, document: &StoredDatabase) -> Result<()>;
}
