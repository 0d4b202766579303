//! In-memory storage backend
//!
//! Keeps serialized documents in a shared map. Clones share the same map, so
//! a database created through one handle can be connected through another.
//! Documents still go through the JSON encoding, which keeps the backend
//! faithful to what a file would hold.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::storage::document::StoredDatabase;
use crate::storage::error::StorageError;
use crate::storage::StorageBackend;

/// Storage backend that never touches the file system
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    documents: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored JSON text of a database
    pub fn raw(&self, name: &str) -> Option<String> {
        self.documents
            .read()
            .get(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl StorageBackend for InMemoryBackend {
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.documents.read().contains_key(name))
    }

    fn read(&self, name: &str) -> Result<StoredDatabase> {
        let documents = self.documents.read();
        let bytes = documents
            .get(name)
            .ok_or_else(|| StorageError::Missing(name.to_string()))?;
        Ok(StoredDatabase::from_json(bytes)?)
    }

    fn write(&self, name: &str, document: &StoredDatabase) -> Result<()> {
        let bytes = document.to_json(false)?;
        self.documents.write().insert(name.to_string(), bytes);
        Ok(())
    }
}
