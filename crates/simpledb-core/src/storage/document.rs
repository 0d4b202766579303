//! Storage document types
//!
//! The document is a JSON array of table records:
//!
//! ```text
//! [
//!   {
//!     "name": "authors",
//!     "columns": [{"name": "id", "type": "int"}, {"name": "born", "type": "date"}],
//!     "rows": [[1, "1815-12-10"]]
//!   }
//! ]
//! ```
//!
//! Rows are positional lists in column order. Dates are `YYYY-MM-DD` strings.

use serde::{Deserialize, Serialize};

use crate::schema::Column;
use crate::storage::codec::DecodeError;
use crate::storage::error::StorageResult;

/// A whole database as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredDatabase {
    pub tables: Vec<StoredTable>,
}

/// One table as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTable {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl StoredDatabase {
    /// Serialize to JSON bytes
    pub fn to_json(&self, pretty: bool) -> StorageResult<Vec<u8>> {
        let bytes = if pretty {
            serde_json::to_vec_pretty(self)?
        } else {
            serde_json::to_vec(self)?
        };
        Ok(bytes)
    }

    /// Parse JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
