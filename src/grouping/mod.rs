//! Exact-duplicate row tallying.
//!
//! Flattened scheduling rows repeat heavily (the same collection window
//! recurs across plans), so the pipeline stores each distinct row once with
//! a `row_count` column instead of the raw row multiset. Identity is the
//! full tuple of text cells; a null cell and an empty string are different
//! values.

use std::collections::HashMap;
use std::path::Path;

use crate::io::{read_csv_batches, read_csv_header, write_table_csv};
use crate::models::Table;

/// Column appended to the counted output.
pub const ROW_COUNT_COLUMN: &str = "row_count";

#[derive(Debug, thiserror::Error)]
pub enum GroupingError {
    #[error("Input file not found: {0}")]
    InputNotFound(String),
    #[error("Row has {got} cells, tally expects {expected}")]
    ArityMismatch { expected: usize, got: usize },
    #[error("Input already carries a row_count column; refusing to count counts")]
    AlreadyCounted,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Streaming tally of exact-duplicate rows.
///
/// Feed batches in any grouping; the tally only ever merges counts, so
/// regrouping the same rows differently yields the same result. Counts are
/// never reset between batches.
pub struct RowTally {
    columns: Vec<String>,
    index: HashMap<Vec<Option<String>>, usize>,
    keys: Vec<Vec<Option<String>>>,
    counts: Vec<u64>,
    total: u64,
}

impl RowTally {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            index: HashMap::new(),
            keys: Vec::new(),
            counts: Vec::new(),
            total: 0,
        }
    }

    /// Record one row. The cell count must match the tally's column count.
    pub fn observe(&mut self, row: Vec<Option<String>>) -> Result<(), GroupingError> {
        if row.len() != self.columns.len() {
            return Err(GroupingError::ArityMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.total += 1;
        if let Some(&i) = self.index.get(&row) {
            self.counts[i] += 1;
        } else {
            self.index.insert(row.clone(), self.counts.len());
            self.keys.push(row);
            self.counts.push(1);
        }
        Ok(())
    }

    pub fn observe_batch<I>(&mut self, rows: I) -> Result<(), GroupingError>
    where
        I: IntoIterator<Item = Vec<Option<String>>>,
    {
        for row in rows {
            self.observe(row)?;
        }
        Ok(())
    }

    /// Number of distinct rows seen so far.
    pub fn distinct_rows(&self) -> usize {
        self.counts.len()
    }

    /// Total rows observed, i.e. the sum of all counts.
    pub fn total_rows(&self) -> u64 {
        self.total
    }

    /// Finish the tally: one row per distinct input row plus `row_count`,
    /// most frequent first. Ties keep first-observation order.
    pub fn into_counted(self) -> Table {
        let mut order: Vec<usize> = (0..self.counts.len()).collect();
        order.sort_by(|&a, &b| self.counts[b].cmp(&self.counts[a]));

        let mut columns = self.columns;
        columns.push(ROW_COUNT_COLUMN.to_string());

        let mut out = Table::new(columns);
        for i in order {
            let mut row = self.keys[i].clone();
            row.push(Some(self.counts[i].to_string()));
            out.push_row(row);
        }
        out
    }
}

/// Tally a whole table, feeding it through in fixed-size batches.
///
/// Counted output is not regroupable: a second pass would tally over the
/// count column itself and emit a colliding column name, so it is rejected.
pub fn group_table(table: &Table, batch_size: usize) -> Result<Table, GroupingError> {
    if table.has_column(ROW_COUNT_COLUMN) {
        return Err(GroupingError::AlreadyCounted);
    }
    let mut tally = RowTally::new(table.columns().to_vec());
    for chunk in table.rows().chunks(batch_size.max(1)) {
        tally.observe_batch(chunk.iter().cloned())?;
    }
    Ok(tally.into_counted())
}

/// Summary of one file-level grouping run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct GroupReport {
    pub input_rows: u64,
    pub distinct_rows: usize,
}

/// Group a flat CSV file into a counted CSV file.
///
/// The input is consumed in bounded batches: resident memory is one batch
/// plus the tally, which holds one entry per distinct row rather than per
/// input row. The header is captured up front, so a file with zero data
/// rows still yields a correctly-shaped (empty) counted output.
///
/// A missing input is fatal: an empty counted output would be
/// indistinguishable from a legitimately empty dataset downstream.
pub fn group_csv_file(
    input: &Path,
    output: &Path,
    batch_size: usize,
) -> Result<GroupReport, GroupingError> {
    if !input.exists() {
        return Err(GroupingError::InputNotFound(input.display().to_string()));
    }

    let columns = read_csv_header(input)?;
    if columns.iter().any(|c| c == ROW_COUNT_COLUMN) {
        return Err(GroupingError::AlreadyCounted);
    }

    let mut tally = RowTally::new(columns);
    let mut batches = read_csv_batches(input, batch_size)?;
    while let Some(batch) = batches.next_table()? {
        tally.observe_batch(batch.into_rows())?;
    }

    let report = GroupReport {
        input_rows: tally.total_rows(),
        distinct_rows: tally.distinct_rows(),
    };
    tracing::info!(
        input_rows = report.input_rows,
        distinct_rows = report.distinct_rows,
        "grouped duplicate rows"
    );

    write_table_csv(&tally.into_counted(), output)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_table_csv;

    fn row(cells: &[Option<&str>]) -> Vec<Option<String>> {
        cells.iter().map(|c| c.map(str::to_string)).collect()
    }

    fn sample_tally() -> RowTally {
        RowTally::new(vec!["a".to_string(), "b".to_string()])
    }

    #[test]
    fn test_duplicate_rows_are_merged() {
        let mut tally = sample_tally();
        tally.observe(row(&[Some("x"), Some("1")])).unwrap();
        tally.observe(row(&[Some("x"), Some("1")])).unwrap();
        tally.observe(row(&[Some("y"), Some("2")])).unwrap();

        assert_eq!(tally.distinct_rows(), 2);
        assert_eq!(tally.total_rows(), 3);

        let counted = tally.into_counted();
        assert_eq!(counted.cell(0, "a"), Some("x"));
        assert_eq!(counted.cell(0, ROW_COUNT_COLUMN), Some("2"));
        assert_eq!(counted.cell(1, ROW_COUNT_COLUMN), Some("1"));
    }

    #[test]
    fn test_null_and_empty_string_are_distinct() {
        let mut tally = sample_tally();
        tally.observe(row(&[None, Some("1")])).unwrap();
        tally.observe(row(&[Some(""), Some("1")])).unwrap();
        assert_eq!(tally.distinct_rows(), 2);
    }

    #[test]
    fn test_batching_does_not_change_result() {
        let rows: Vec<_> = (0..10)
            .map(|i| row(&[Some(if i % 3 == 0 { "x" } else { "y" }), Some("1")]))
            .collect();

        let table = {
            let mut t = Table::new(vec!["a".to_string(), "b".to_string()]);
            for r in rows {
                t.push_row(r);
            }
            t
        };

        let whole = group_table(&table, 1000).unwrap();
        let chunked = group_table(&table, 3).unwrap();
        assert_eq!(whole, chunked);
    }

    #[test]
    fn test_ties_keep_first_observation_order() {
        let mut tally = sample_tally();
        tally.observe(row(&[Some("late"), Some("1")])).unwrap();
        tally.observe(row(&[Some("heavy"), Some("1")])).unwrap();
        tally.observe(row(&[Some("heavy"), Some("1")])).unwrap();
        tally.observe(row(&[Some("early"), Some("1")])).unwrap();

        let counted = tally.into_counted();
        assert_eq!(counted.cell(0, "a"), Some("heavy"));
        // "late" and "early" both count 1; discovery order decides.
        assert_eq!(counted.cell(1, "a"), Some("late"));
        assert_eq!(counted.cell(2, "a"), Some("early"));
    }

    #[test]
    fn test_arity_mismatch_is_rejected() {
        let mut tally = sample_tally();
        let err = tally.observe(row(&[Some("x")])).unwrap_err();
        assert!(matches!(
            err,
            GroupingError::ArityMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_group_csv_file_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = group_csv_file(
            &dir.path().join("missing.csv"),
            &dir.path().join("out.csv"),
            1000,
        )
        .unwrap_err();
        assert!(matches!(err, GroupingError::InputNotFound(_)));
    }

    #[test]
    fn test_group_csv_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("flat.csv");
        let output = dir.path().join("counted.csv");
        std::fs::write(&input, "a,b\nx,1\nx,1\ny,2\n").unwrap();

        let report = group_csv_file(&input, &output, 1000).unwrap();
        assert_eq!(report.input_rows, 3);
        assert_eq!(report.distinct_rows, 2);

        let counted = read_table_csv(&output).unwrap();
        assert_eq!(counted.height(), 2);
        assert_eq!(counted.cell(0, ROW_COUNT_COLUMN), Some("2"));
    }
}
