//! Schema-uniform text table.
//!
//! [`Table`] is the tabular intermediate shared by the whole pipeline: an
//! ordered list of column names and rows of nullable text cells. Everything
//! downstream of flattening (grouping, enrichment, analytics) compares cells
//! as text, so values are normalized once, here, via [`canonical_text`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One flattened record: column/value pairs in emission order.
pub type FlatRow = Vec<(String, Option<String>)>;

/// Canonical text form of a JSON value, used as the grouping key.
///
/// Rules (part of the grouping-key contract):
/// - null -> absent cell (`None`)
/// - strings pass through unchanged
/// - booleans -> `true` / `false`
/// - integers render without a fractional part; floats use the shortest
///   round-trip form, so `5.0` and integer `5` both canonicalize to `"5"`
/// - arrays/objects (free-form hint blocks) -> compact JSON text
pub fn canonical_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                Some(n.as_f64().unwrap_or(f64::NAN).to_string())
            }
        }
        other => Some(other.to_string()),
    }
}

/// Ordered columns plus rows of nullable text cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Create an empty table with the given column set.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from flat records, unioning their column sets.
    ///
    /// Column order is first-seen order across all records; cells for columns
    /// a record did not emit are null. This mirrors how the source records
    /// behave: sparse nested blocks yield nulls, never missing columns.
    pub fn from_records(records: &[FlatRow]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for record in records {
            for (name, _) in record {
                if !index.contains_key(name) {
                    index.insert(name.clone(), columns.len());
                    columns.push(name.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let mut row = vec![None; columns.len()];
            for (name, value) in record {
                if let Some(&i) = index.get(name) {
                    row[i] = value.clone();
                }
            }
            rows.push(row);
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Consume the table, yielding its rows.
    pub fn into_rows(self) -> Vec<Vec<Option<String>>> {
        self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell value by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Append a row, padding or truncating to the table's width.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// Append a column, padding existing rows with the computed values.
    ///
    /// `values` must be produced per row; shorter inputs pad with null.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Option<String>>) {
        self.columns.push(name.into());
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.push(values.get(i).cloned().flatten());
        }
    }

    /// New table containing only the rows at the given indices.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}
