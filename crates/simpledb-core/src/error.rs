//! Error types for database operations

use thiserror::Error;

use crate::schema::{SchemaError, ValidationError};
use crate::storage::{DecodeError, StorageError};

/// Errors returned by database, table and row operations
///
/// Every failure aborts the operation that raised it without mutating
/// in-memory state.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database with name \"{0}\" already exists")]
    AlreadyExists(String),

    #[error("Database \"{0}\" does not exist")]
    NotFound(String),

    #[error("Duplicate table name \"{0}\"")]
    DuplicateTable(String),

    #[error("Table name must begin with a letter: \"{0}\"")]
    InvalidName(String),

    #[error("Table \"{0}\" is not defined")]
    UnknownTable(String),

    #[error("Column \"{column}\" not defined in table \"{table}\"")]
    UnknownColumn { column: String, table: String },

    /// Named field lookup on a row for a column the row does not have
    #[error("Row has no field \"{0}\"")]
    UnknownField(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    /// A hint for resolving storage failures, if one applies
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Error::Storage(err) => err.recovery_suggestion(),
            _ => None,
        }
    }
}

/// Result type for database operations
pub type Result<T> = std::result::Result<T, Error>;
