//! SimpleDB Core Library
//!
//! A minimal embedded record store: named databases hold typed tables,
//! rows are validated against the table schema on insert, and queries
//! select rows by exact-match filters.
//!
//! # Architecture
//!
//! - **In-memory tables**: Source of truth while a database is open
//! - **Storage document**: The whole database, rewritten on every commit
//!
//! All queries are served directly from memory; storage is only touched on
//! `create`, `connect` and `commit`.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut db = create_database("library", &config)?;
//!
//! let mut authors = db.create_table(
//!     "authors",
//!     [Column::int("id"), Column::str("name"), Column::bool("alive")],
//! )?;
//! authors.insert(vec![1.into(), "Ada".into(), false.into()])?;
//!
//! let dead = db.table("authors")?.query(&Filter::new().eq("alive", false))?;
//! ```
//!
//! # Modules
//!
//! - `database`: Database lifecycle and commit orchestration (main entry point)
//! - `table`: Insert, query, count and describe
//! - `schema`: Column declarations and row validation
//! - `row`: Validated rows with named field access
//! - `query`: Equality filters and the row iterator
//! - `value`: Typed cell values
//! - `storage`: Storage backends and the document codec
//! - `config`: Application configuration

pub mod config;
pub mod database;
pub mod error;
pub mod query;
pub mod row;
pub mod schema;
pub mod storage;
pub mod table;
pub mod value;

pub use config::Config;
pub use database::{connect_database, create_database, Database, DatabaseOptions};
pub use error::{Error, Result};
pub use query::{Filter, Rows};
pub use row::Row;
pub use schema::{Column, Schema, SchemaError, ValidationError};
pub use storage::{
    DecodeError, FileBackend, InMemoryBackend, StorageBackend, StorageError, StoredDatabase,
};
pub use table::{Table, TableMut};
pub use value::{ColumnType, Value};
