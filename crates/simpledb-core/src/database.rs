//! Databases
//!
//! A `Database` owns its tables, in creation order, and the storage backend
//! they are committed to. Every commit writes the whole database as one
//! document.
//!
//! ## Usage
//!
//! ```ignore
//! let mut db = Database::create("library", InMemoryBackend::new(), DatabaseOptions::default())?;
//!
//! let mut authors = db.create_table("authors", [Column::int("id"), Column::str("name")])?;
//! authors.insert(vec![1.into(), "Ada".into()])?;  // committed
//!
//! let ada = db.table("authors")?.query(&Filter::new().eq("id", 1))?;
//! ```

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::schema::{starts_with_letter, Column, Schema};
use crate::storage::{codec, FileBackend, StorageBackend};
use crate::table::{Table, TableMut};

/// Per-database behavior fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseOptions {
    /// Persist the whole database after every `create_table` and `insert`.
    /// When off, nothing is written until `commit` is called.
    pub autocommit: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self { autocommit: true }
    }
}

/// A named collection of tables bound to a storage backend
#[derive(Debug)]
pub struct Database<B: StorageBackend = FileBackend> {
    name: String,
    tables: Vec<Table>,
    backend: B,
    options: DatabaseOptions,
}

/// Create a new file-backed database as configured by `config`
pub fn create_database(name: &str, config: &Config) -> Result<Database> {
    Database::create(
        name,
        FileBackend::from_config(config),
        config.database_options(),
    )
}

/// Open an existing file-backed database as configured by `config`
pub fn connect_database(name: &str, config: &Config) -> Result<Database> {
    Database::connect(
        name,
        FileBackend::from_config(config),
        config.database_options(),
    )
}

impl<B: StorageBackend> Database<B> {
    /// Create a new, empty database
    ///
    /// Fails if the backend already holds a database with this name. The
    /// empty database is written out immediately, so it can be connected
    /// to and cannot be created twice.
    pub fn create(name: impl Into<String>, backend: B, options: DatabaseOptions) -> Result<Self> {
        let name = name.into();
        if backend.exists(&name)? {
            return Err(Error::AlreadyExists(name));
        }

        let db = Self {
            name,
            tables: Vec::new(),
            backend,
            options,
        };
        db.commit()?;

        info!("Created database '{}'", db.name);
        Ok(db)
    }

    /// Open a stored database
    ///
    /// Every table is rebuilt from the stored document with its columns and
    /// rows in stored order. Nothing is constructed if the document is
    /// missing or does not decode.
    pub fn connect(name: impl Into<String>, backend: B, options: DatabaseOptions) -> Result<Self> {
        let name = name.into();
        if !backend.exists(&name)? {
            return Err(Error::NotFound(name));
        }

        let document = backend.read(&name)?;
        let tables = codec::decode_tables(document)?;

        info!(
            "Connected to database '{}' ({} tables)",
            name,
            tables.len()
        );
        Ok(Self {
            name,
            tables,
            backend,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> DatabaseOptions {
        self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Define a new table
    ///
    /// The name must be unused in this database and begin with a letter.
    /// With autocommit on, the database is committed before returning; if
    /// that fails the table is removed again.
    pub fn create_table(
        &mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = Column>,
    ) -> Result<TableMut<'_, B>> {
        let name = name.into();
        if self.tables.iter().any(|t| t.name() == name) {
            return Err(Error::DuplicateTable(name));
        }
        if !starts_with_letter(&name) {
            return Err(Error::InvalidName(name));
        }
        let schema = Schema::define(columns)?;

        self.tables.push(Table::new(name, schema));

        if self.options.autocommit {
            if let Err(err) = self.commit() {
                if let Some(table) = self.tables.pop() {
                    warn!(
                        suggestion = err.recovery_suggestion(),
                        "Commit after creating table '{}' failed, table discarded: {}",
                        table.name(),
                        err
                    );
                }
                return Err(err);
            }
        }

        let index = self.tables.len() - 1;
        Ok(TableMut::new(self, index))
    }

    /// Table names in creation order
    pub fn show_tables(&self) -> Vec<&str> {
        self.tables.iter().map(Table::name).collect()
    }

    /// Tables in creation order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Look up a table for reading
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    /// Look up a table for inserting
    pub fn table_mut(&mut self, name: &str) -> Result<TableMut<'_, B>> {
        let index = self
            .tables
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))?;
        Ok(TableMut::new(self, index))
    }

    /// Write every table, with its columns and rows, to storage
    pub fn commit(&self) -> Result<()> {
        let document = codec::encode_tables(&self.tables);
        self.backend.write(&self.name, &document)?;
        debug!(
            "Committed database '{}' ({} tables)",
            self.name,
            self.tables.len()
        );
        Ok(())
    }

    pub(crate) fn table_at(&self, index: usize) -> &Table {
        &self.tables[index]
    }

    pub(crate) fn table_at_mut(&mut self, index: usize) -> &mut Table {
        &mut self.tables[index]
    }
}

impl<B: StorageBackend> fmt::Display for Database<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Database '{}'>", self.name)
    }
}
