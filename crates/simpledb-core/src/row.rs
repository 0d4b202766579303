//! Validated rows

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::value::Value;

/// One schema-conforming record of a table
///
/// Rows are immutable once stored. They share their table's schema, which
/// backs named field access.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Row {
    /// Callers must have validated `values` against `schema`, or decoded them
    /// column by column from storage.
    pub(crate) fn new(schema: Arc<Schema>, values: Vec<Value>) -> Self {
        Self { schema, values }
    }

    /// Value of the named column
    pub fn field(&self, name: &str) -> Result<&Value> {
        self.schema
            .position(name)
            .map(|i| &self.values[i])
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }

    /// Value at a column position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// All values, in column order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// `(column name, value)` pairs, in column order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema.names().zip(self.values.iter())
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}
