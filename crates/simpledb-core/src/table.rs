//! Tables
//!
//! A `Table` owns a schema and its rows and serves every read operation.
//! Inserts go through `TableMut`, a handle borrowed from the owning
//! `Database` so that a successful insert can trigger a commit.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use tracing::warn;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::query::{Filter, Rows};
use crate::row::Row;
use crate::schema::{Column, Schema, ValidationError};
use crate::storage::StorageBackend;
use crate::value::Value;

/// A named, typed collection of rows
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    schema: Arc<Schema>,
    rows: Vec<Row>,
}

impl Table {
    pub(crate) fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema: Arc::new(schema),
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The declared columns, unchanged and in order
    pub fn describe(&self) -> &[Column] {
        self.schema.columns()
    }

    /// Number of rows currently stored
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Every row, in insertion order
    pub fn all(&self) -> Rows<'_> {
        Rows::new(&self.rows, Vec::new())
    }

    /// Rows whose values equal every term of `filter`, in insertion order
    ///
    /// Fails if a term names a column the table does not declare, or if a
    /// term's value is not of the column's type.
    pub fn query(&self, filter: &Filter) -> Result<Rows<'_>> {
        let mut predicates = Vec::with_capacity(filter.terms().len());
        for (column, value) in filter.terms() {
            let index = self
                .schema
                .position(column)
                .ok_or_else(|| Error::UnknownColumn {
                    column: column.clone(),
                    table: self.name.clone(),
                })?;

            let expected = self.schema.columns()[index].column_type;
            if value.column_type() != expected {
                return Err(ValidationError::WrongType {
                    column: column.clone(),
                    given: value.column_type(),
                    expected,
                }
                .into());
            }
            predicates.push((index, value.clone()));
        }

        Ok(Rows::new(&self.rows, predicates))
    }

    /// Validate and append a row without committing
    pub(crate) fn push(&mut self, values: Vec<Value>) -> std::result::Result<(), ValidationError> {
        self.schema.validate(&values)?;
        self.rows.push(Row::new(self.schema.clone(), values));
        Ok(())
    }

    /// Append a row decoded from storage; its cells are already typed
    pub(crate) fn push_decoded(&mut self, values: Vec<Value>) {
        self.rows.push(Row::new(self.schema.clone(), values));
    }

    /// Drop the most recent row after a failed commit
    pub(crate) fn discard_last(&mut self) {
        self.rows.pop();
    }

    pub(crate) fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<&str> = self.schema.names().collect();
        writeln!(f, "{}", header.join("\t"))?;
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Mutable access to one table of a database
///
/// Dereferences to [`Table`] for reads.
pub struct TableMut<'a, B: StorageBackend> {
    db: &'a mut Database<B>,
    index: usize,
}

impl<'a, B: StorageBackend> TableMut<'a, B> {
    pub(crate) fn new(db: &'a mut Database<B>, index: usize) -> Self {
        Self { db, index }
    }

    /// Insert a row
    ///
    /// The row is validated against the schema first; a rejected row leaves
    /// the table untouched. With autocommit on, the whole database is then
    /// written out, and the row is taken back out if that write fails.
    pub fn insert(&mut self, values: Vec<Value>) -> Result<()> {
        self.db.table_at_mut(self.index).push(values)?;

        if self.db.options().autocommit {
            if let Err(err) = self.db.commit() {
                warn!(
                    suggestion = err.recovery_suggestion(),
                    "Commit after insert into '{}' failed, row discarded: {}",
                    self.name(),
                    err
                );
                self.db.table_at_mut(self.index).discard_last();
                return Err(err);
            }
        }

        Ok(())
    }
}

impl<B: StorageBackend> fmt::Debug for TableMut<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableMut")
            .field("table", &**self)
            .finish()
    }
}

impl<B: StorageBackend> Deref for TableMut<'_, B> {
    type Target = Table;

    fn deref(&self) -> &Table {
        self.db.table_at(self.index)
    }
}
