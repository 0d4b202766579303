//! Equality filters and the row iterator they produce

use std::slice;

use crate::row::Row;
use crate::value::Value;

/// A conjunction of `column == value` terms
///
/// An empty filter matches every row. Terms are checked against the table
/// schema when the filter is applied, not when it is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    terms: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column` to equal `value`
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms.push((column.into(), value.into()));
        self
    }

    pub fn terms(&self) -> &[(String, Value)] {
        &self.terms
    }
}

impl<K, V> FromIterator<(K, V)> for Filter
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Filter::new(), |filter, (column, value)| filter.eq(column, value))
    }
}

/// Lazy iterator over the rows of a table that match a filter
///
/// Rows come out in insertion order. The iterator borrows the table, so the
/// table cannot change while it is being walked. A clone continues from the
/// same position; call `query` again to re-scan.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    rows: slice::Iter<'a, Row>,
    /// Resolved `(column position, expected value)` pairs
    predicates: Vec<(usize, Value)>,
}

impl<'a> Rows<'a> {
    pub(crate) fn new(rows: &'a [Row], predicates: Vec<(usize, Value)>) -> Self {
        Self {
            rows: rows.iter(),
            predicates,
        }
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        let predicates = &self.predicates;
        self.rows.find(|row| {
            predicates
                .iter()
                .all(|(index, value)| row.get(*index) == Some(value))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.rows.size_hint();
        if self.predicates.is_empty() {
            (upper.unwrap_or(0), upper)
        } else {
            (0, upper)
        }
    }
}
