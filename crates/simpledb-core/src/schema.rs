//! Table schemas
//!
//! A schema is the ordered list of columns a table declares at creation.
//! It never changes afterwards. Candidate rows are validated against it
//! before they are accepted.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::{ColumnType, Value};

/// Errors in a column declaration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("A table must declare at least one column")]
    NoColumns,

    #[error("Column at position {position} has an empty name")]
    EmptyColumnName { position: usize },

    #[error("Column name must begin with a letter: \"{0}\"")]
    InvalidColumnName(String),

    #[error("Duplicate column name \"{0}\"")]
    DuplicateColumn(String),
}

/// Errors raised when a candidate row does not fit the schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid amount of fields: given {given}, expected {expected}")]
    WrongArity { given: usize, expected: usize },

    #[error("Invalid type of field \"{column}\": given \"{given}\", expected \"{expected}\"")]
    WrongType {
        column: String,
        given: ColumnType,
        expected: ColumnType,
    },

    #[error("Date {value} in field \"{column}\" is outside the storable years 0..=9999")]
    DateOutOfRange { column: String, value: NaiveDate },
}

/// A single column declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Int)
    }

    pub fn str(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Str)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Bool)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Date)
    }
}

/// An ordered, non-empty list of uniquely named columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Build a schema from column declarations
    ///
    /// Names must be non-empty, start with an ASCII letter and be unique.
    /// Uniqueness is checked by exact match.
    pub fn define(columns: impl IntoIterator<Item = Column>) -> Result<Self, SchemaError> {
        let columns: Vec<Column> = columns.into_iter().collect();
        if columns.is_empty() {
            return Err(SchemaError::NoColumns);
        }

        for (position, column) in columns.iter().enumerate() {
            if column.name.is_empty() {
                return Err(SchemaError::EmptyColumnName { position });
            }
            if !starts_with_letter(&column.name) {
                return Err(SchemaError::InvalidColumnName(column.name.clone()));
            }
            if columns[..position].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Self { columns })
    }

    /// The declared columns, in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Position of the named column
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check a candidate row against this schema
    ///
    /// Stops at the first offending column, scanning left to right.
    pub fn validate(&self, values: &[Value]) -> Result<(), ValidationError> {
        if values.len() != self.columns.len() {
            return Err(ValidationError::WrongArity {
                given: values.len(),
                expected: self.columns.len(),
            });
        }

        for (column, value) in self.columns.iter().zip(values) {
            let given = value.column_type();
            if given != column.column_type {
                return Err(ValidationError::WrongType {
                    column: column.name.clone(),
                    given,
                    expected: column.column_type,
                });
            }
            if let Value::Date(date) = value {
                if !(0..=9999).contains(&date.year()) {
                    return Err(ValidationError::DateOutOfRange {
                        column: column.name.clone(),
                        value: *date,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Leading-letter rule shared by table and column names
pub(crate) fn starts_with_letter(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors() -> Schema {
        Schema::define([Column::int("id"), Column::str("name"), Column::bool("alive")]).unwrap()
    }

    #[test]
    fn test_define_keeps_order() {
        let schema = authors();
        let names: Vec<&str> = schema.names().collect();
        assert_eq!(names, vec!["id", "name", "alive"]);
        assert_eq!(schema.position("alive"), Some(2));
        assert_eq!(schema.column("name").unwrap().column_type, ColumnType::Str);
        assert!(schema.position("missing").is_none());
    }

    #[test]
    fn test_define_rejects_bad_columns() {
        assert_eq!(
            Schema::define(Vec::new()).unwrap_err(),
            SchemaError::NoColumns
        );
        assert_eq!(
            Schema::define([Column::int("id"), Column::str("")]).unwrap_err(),
            SchemaError::EmptyColumnName { position: 1 }
        );
        assert_eq!(
            Schema::define([Column::int("_id")]).unwrap_err(),
            SchemaError::InvalidColumnName("_id".to_string())
        );
        assert_eq!(
            Schema::define([Column::int("1st")]).unwrap_err(),
            SchemaError::InvalidColumnName("1st".to_string())
        );
        assert_eq!(
            Schema::define([Column::int("id"), Column::str("id")]).unwrap_err(),
            SchemaError::DuplicateColumn("id".to_string())
        );
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let schema = Schema::define([Column::int("id"), Column::int("ID")]).unwrap();
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_validate_accepts_matching_row() {
        let values = vec![Value::from(1), "Ada".into(), true.into()];
        assert!(authors().validate(&values).is_ok());
    }

    #[test]
    fn test_validate_wrong_arity() {
        let values = vec![Value::from(1), "A".into()];
        assert_eq!(
            authors().validate(&values).unwrap_err(),
            ValidationError::WrongArity {
                given: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn test_validate_reports_first_mismatch() {
        let values = vec![Value::from(true), Value::from(2), "x".into()];
        let err = authors().validate(&values).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongType {
                column: "id".to_string(),
                given: ColumnType::Bool,
                expected: ColumnType::Int,
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid type of field \"id\": given \"bool\", expected \"int\""
        );
    }

    #[test]
    fn test_validate_date_range() {
        let schema = Schema::define([Column::date("born")]).unwrap();
        let ok = NaiveDate::from_ymd_opt(1899, 8, 24).unwrap();
        assert!(schema.validate(&[ok.into()]).is_ok());

        let far = NaiveDate::from_ymd_opt(12000, 1, 1).unwrap();
        assert!(matches!(
            schema.validate(&[far.into()]),
            Err(ValidationError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_column_serialization() {
        let json = serde_json::to_string(&Column::date("born")).unwrap();
        assert_eq!(json, r#"{"name":"born","type":"date"}"#);
        let parsed: Column = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Column::date("born"));
    }
}
