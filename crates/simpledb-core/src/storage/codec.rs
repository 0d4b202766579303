//! Conversion between in-memory tables and the storage document
//!
//! Encoding is a pure function of the current tables. Decoding type-checks
//! every stored cell against its column, so decoded rows are exactly what
//! `insert` would have produced for the same values.

use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::schema::{starts_with_letter, Schema, SchemaError};
use crate::storage::document::{StoredDatabase, StoredTable};
use crate::table::Table;
use crate::value::{ColumnType, Value};

/// Errors in a stored document
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed storage document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid date \"{0}\": expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid table name \"{0}\" in storage document")]
    InvalidTableName(String),

    #[error("Table \"{0}\" appears more than once in storage document")]
    DuplicateTable(String),

    #[error("Invalid columns for table \"{table}\": {source}")]
    InvalidSchema {
        table: String,
        #[source]
        source: SchemaError,
    },

    #[error("Row {row} of table \"{table}\" has {given} fields, expected {expected}")]
    RowArity {
        table: String,
        row: usize,
        given: usize,
        expected: usize,
    },

    #[error("Row {row} of table \"{table}\": field \"{column}\" holds {found}, expected {expected}")]
    FieldType {
        table: String,
        row: usize,
        column: String,
        found: JsonValue,
        expected: ColumnType,
    },
}

/// Build the storage document for a set of tables
pub fn encode_tables<'a>(tables: impl IntoIterator<Item = &'a Table>) -> StoredDatabase {
    let tables = tables
        .into_iter()
        .map(|table| StoredTable {
            name: table.name().to_string(),
            columns: table.describe().to_vec(),
            rows: table
                .rows()
                .iter()
                .map(|row| row.values().iter().map(encode_value).collect())
                .collect(),
        })
        .collect();

    StoredDatabase { tables }
}

/// Rebuild tables from a storage document, in stored order
pub fn decode_tables(document: StoredDatabase) -> Result<Vec<Table>, DecodeError> {
    let mut tables: Vec<Table> = Vec::with_capacity(document.tables.len());

    for stored in document.tables {
        if !starts_with_letter(&stored.name) {
            return Err(DecodeError::InvalidTableName(stored.name));
        }
        if tables.iter().any(|t| t.name() == stored.name) {
            return Err(DecodeError::DuplicateTable(stored.name));
        }

        let schema =
            Schema::define(stored.columns).map_err(|source| DecodeError::InvalidSchema {
                table: stored.name.clone(),
                source,
            })?;
        let mut table = Table::new(stored.name, schema);

        for (index, raw) in stored.rows.into_iter().enumerate() {
            let values = decode_row(&table, index, raw)?;
            table.push_decoded(values);
        }

        tables.push(table);
    }

    Ok(tables)
}

fn decode_row(table: &Table, row: usize, raw: Vec<JsonValue>) -> Result<Vec<Value>, DecodeError> {
    let columns = table.describe();
    if raw.len() != columns.len() {
        return Err(DecodeError::RowArity {
            table: table.name().to_string(),
            row,
            given: raw.len(),
            expected: columns.len(),
        });
    }

    columns
        .iter()
        .zip(raw)
        .map(|(column, cell)| {
            decode_value(column.column_type, &cell)?.ok_or_else(|| DecodeError::FieldType {
                table: table.name().to_string(),
                row,
                column: column.name.clone(),
                found: cell,
                expected: column.column_type,
            })
        })
        .collect()
}

/// Encode one cell; dates become `YYYY-MM-DD` strings
pub fn encode_value(value: &Value) -> JsonValue {
    match value {
        Value::Int(v) => JsonValue::from(*v),
        Value::Str(v) => JsonValue::from(v.as_str()),
        Value::Bool(v) => JsonValue::from(*v),
        Value::Date(d) => JsonValue::from(format_date(*d)),
    }
}

/// Decode one cell as the given column type
///
/// Returns `Ok(None)` when the JSON kind does not fit the column.
pub fn decode_value(column_type: ColumnType, cell: &JsonValue) -> Result<Option<Value>, DecodeError> {
    let value = match (column_type, cell) {
        (ColumnType::Int, JsonValue::Number(n)) => n.as_i64().map(Value::Int),
        (ColumnType::Str, JsonValue::String(s)) => Some(Value::Str(s.clone())),
        (ColumnType::Bool, JsonValue::Bool(b)) => Some(Value::Bool(*b)),
        (ColumnType::Date, JsonValue::String(s)) => Some(Value::Date(parse_date(s)?)),
        _ => None,
    };
    Ok(value)
}

/// Format a date as zero-padded `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a zero-padded `YYYY-MM-DD` date
///
/// Year, month and day are read from fixed offsets 0..4, 5..7 and 8..10.
/// No other layout is accepted.
pub fn parse_date(s: &str) -> Result<NaiveDate, DecodeError> {
    let invalid = || DecodeError::InvalidDate(s.to_string());
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }

    let number = |part: &[u8]| -> Result<u32, DecodeError> {
        if !part.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        Ok(part
            .iter()
            .fold(0, |acc, digit| acc * 10 + u32::from(digit - b'0')))
    };

    let year = number(&bytes[0..4])?;
    let month = number(&bytes[5..7])?;
    let day = number(&bytes[8..10])?;

    // year has at most four digits, so it always fits
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}
