//! Tabular file interchange.
//!
//! Converts between the pipeline's [`Table`] and on-disk CSV/parquet files
//! via Polars. All CSV traffic is text-typed on both sides: files are read
//! with schema inference disabled so numeric-looking cells stay strings and
//! grouping keys survive a round trip unchanged.

use anyhow::{Context, Result};
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use crate::models::Table;

fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.width());
    for (i, name) in table.columns().iter().enumerate() {
        let values: Vec<Option<&str>> = table.rows().iter().map(|row| row[i].as_deref()).collect();
        columns.push(Series::new(name.as_str().into(), values).into());
    }
    DataFrame::new(columns).context("Failed to assemble DataFrame")
}

fn dataframe_to_table(df: &DataFrame) -> Result<Table> {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut table = Table::new(columns);
    for i in 0..df.height() {
        let mut row = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let value = column.get(i).context("Row index out of bounds")?;
            // String values are matched explicitly: AnyValue's Display quotes
            // them, which would corrupt the cell text.
            row.push(match value {
                AnyValue::Null => None,
                AnyValue::String(s) => Some(s.to_string()),
                AnyValue::StringOwned(s) => Some(s.to_string()),
                other => Some(other.to_string()),
            });
        }
        table.push_row(row);
    }
    Ok(table)
}

/// Write a table as a headered CSV file.
pub fn write_table_csv(table: &Table, path: &Path) -> Result<()> {
    let mut df = table_to_dataframe(table)?;
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV {}", path.display()))?;
    Ok(())
}

/// Render a table as in-memory CSV bytes (used for checksumming and the
/// export endpoint).
pub fn write_table_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut df = table_to_dataframe(table)?;
    let mut cursor = Cursor::new(Vec::new());
    CsvWriter::new(&mut cursor)
        .include_header(true)
        .finish(&mut df)
        .context("Failed to render CSV")?;
    Ok(cursor.into_inner())
}

/// Read a headered CSV file with schema inference disabled, so every cell
/// comes back as text.
pub fn read_table_csv(path: &Path) -> Result<Table> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to open CSV {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV {}", path.display()))?;
    dataframe_to_table(&df)
}

/// Column names of a headered CSV file, reading no data rows.
///
/// Lets the grouping path capture the schema up front, so a file with zero
/// data rows still produces a correctly-shaped output.
pub fn read_csv_header(path: &Path) -> Result<Vec<String>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_n_rows(Some(0))
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to open CSV {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV header {}", path.display()))?;
    Ok(df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect())
}

/// Streaming CSV source yielding bounded-size [`Table`] batches, so callers
/// hold at most one batch of rows in memory at a time.
pub struct CsvBatches {
    inner: OwnedBatchedCsvReader,
}

impl CsvBatches {
    /// Next batch of rows, or `None` once the file is exhausted.
    pub fn next_table(&mut self) -> Result<Option<Table>> {
        let batches = self
            .inner
            .next_batches(1)
            .context("Failed to read CSV batch")?;
        match batches.and_then(|dfs| dfs.into_iter().next()) {
            Some(df) => Ok(Some(dataframe_to_table(&df)?)),
            None => Ok(None),
        }
    }
}

/// Open a headered CSV file for batched reading. Schema inference is
/// disabled as in [`read_table_csv`]; `batch_size` caps the rows per batch.
pub fn read_csv_batches(path: &Path, batch_size: usize) -> Result<CsvBatches> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV {}", path.display()))?;
    let reader = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_chunk_size(batch_size.max(1))
        .into_reader_with_file_handle(Box::new(file) as Box<dyn MmapBytesReader>);
    let inner = reader
        .batched(None)
        .with_context(|| format!("Failed to start batched read of {}", path.display()))?;
    Ok(CsvBatches { inner })
}

/// Read a parquet file, rendering every cell to its text form.
pub fn read_table_parquet(path: &Path) -> Result<Table> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open parquet {}", path.display()))?;
    let df = ParquetReader::new(file)
        .finish()
        .with_context(|| format!("Failed to parse parquet {}", path.display()))?;
    dataframe_to_table(&df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let records = vec![
            vec![
                ("provider".to_string(), Some("P1".to_string())),
                ("count".to_string(), Some("5".to_string())),
            ],
            vec![
                ("provider".to_string(), Some("P2".to_string())),
                ("count".to_string(), None),
            ],
        ];
        Table::from_records(&records)
    }

    #[test]
    fn test_csv_roundtrip_preserves_text_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = sample_table();

        write_table_csv(&table, &path).unwrap();
        let read_back = read_table_csv(&path).unwrap();

        assert_eq!(read_back.columns(), table.columns());
        assert_eq!(read_back.cell(0, "provider"), Some("P1"));
        // Inference is off: the numeric-looking cell stays text.
        assert_eq!(read_back.cell(0, "count"), Some("5"));
        assert_eq!(read_back.cell(1, "count"), None);
    }

    #[test]
    fn test_batched_read_covers_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.csv");
        std::fs::write(&path, "a,b\n1,x\n2,y\n3,z\n4,w\n5,v\n").unwrap();

        assert_eq!(read_csv_header(&path).unwrap(), vec!["a", "b"]);

        let mut batches = read_csv_batches(&path, 2).unwrap();
        let mut rows = Vec::new();
        while let Some(batch) = batches.next_table().unwrap() {
            assert_eq!(batch.columns(), &["a", "b"]);
            rows.extend(batch.into_rows());
        }
        assert_eq!(rows, read_table_csv(&path).unwrap().into_rows());
    }

    #[test]
    fn test_batched_read_of_header_only_file_yields_no_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "a,b\n").unwrap();

        assert_eq!(read_csv_header(&path).unwrap(), vec!["a", "b"]);
        let mut batches = read_csv_batches(&path, 2).unwrap();
        assert!(batches.next_table().unwrap().is_none());
    }

    #[test]
    fn test_parquet_read_renders_text_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.parquet");
        let mut df = table_to_dataframe(&sample_table()).unwrap();
        let file = File::create(&path).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();

        let read_back = read_table_parquet(&path).unwrap();

        assert_eq!(read_back.columns(), &["provider", "count"]);
        assert_eq!(read_back.cell(1, "provider"), Some("P2"));
        assert_eq!(read_back.cell(1, "count"), None);
    }

    #[test]
    fn test_csv_bytes_are_deterministic() {
        let table = sample_table();
        let a = write_table_csv_bytes(&table).unwrap();
        let b = write_table_csv_bytes(&table).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with(b"provider,count\n"));
    }
}
