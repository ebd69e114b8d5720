//! Batch combination of source files.
//!
//! Walks a cache directory of downloaded scheduling files, flattens every
//! record in every recognized file and unions the results into one
//! [`Table`]. File order is lexicographic so a given directory always
//! produces the same table.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::flatten::flatten_record;
use crate::ingest::metadata::extract_file_metadata;
use crate::ingest::mirror::maybe_decompress;
use crate::models::record::parse_records_json_str;
use crate::models::table::FlatRow;
use crate::models::Table;

/// Per-file counters reported after a combine pass.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FileStats {
    pub filename: String,
    pub records: usize,
    pub rows: usize,
}

/// Flatten one source file's bytes into rows.
///
/// `filename` drives both gzip detection and metadata extraction; the bytes
/// must hold a top-level JSON array once decompressed.
pub fn flatten_file(filename: &str, bytes: Vec<u8>) -> Result<(Vec<FlatRow>, FileStats)> {
    let bytes = maybe_decompress(filename, bytes)?;
    let text = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", filename))?;

    let meta = extract_file_metadata(filename);
    if !meta.is_complete() {
        tracing::warn!(file = %filename, "filename does not match <frequency>-<planId>, metadata columns will be null");
    }

    let records = parse_records_json_str(&text)
        .with_context(|| format!("Failed to parse {}", filename))?;

    let mut rows = Vec::new();
    for record in &records {
        rows.extend(flatten_record(record, &meta));
    }
    let stats = FileStats {
        filename: filename.to_string(),
        records: records.len(),
        rows: rows.len(),
    };
    Ok((rows, stats))
}

fn is_source_file(name: &str) -> bool {
    name.ends_with(".json") || name.ends_with(".json.gz")
}

/// Recognized source files under `dir`, lexicographically sorted.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read source directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && is_source_file(&name) {
            paths.push(entry.path());
        } else if entry.file_type()?.is_file() {
            tracing::debug!(file = %name, "skipping unrecognized file");
        }
    }
    paths.sort();
    Ok(paths)
}

/// Flatten every source file under `dir` into one schema-uniform table.
///
/// Per-file failures (unreadable, corrupt gzip, malformed JSON) are logged
/// and skipped; the file is reported as contributing zero rows and the pass
/// continues. Only the missing directory itself is fatal.
pub fn combine_directory(dir: &Path) -> Result<(Table, Vec<FileStats>)> {
    let paths = list_source_files(dir)?;

    let mut all_rows: Vec<FlatRow> = Vec::new();
    let mut stats = Vec::with_capacity(paths.len());
    for path in &paths {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let outcome = fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .and_then(|bytes| flatten_file(&filename, bytes));
        match outcome {
            Ok((rows, file_stats)) => {
                tracing::info!(
                    file = %file_stats.filename,
                    records = file_stats.records,
                    rows = file_stats.rows,
                    "flattened source file"
                );
                all_rows.extend(rows);
                stats.push(file_stats);
            }
            Err(e) => {
                tracing::warn!(file = %filename, error = %e, "skipping unusable source file");
                stats.push(FileStats {
                    filename,
                    records: 0,
                    rows: 0,
                });
            }
        }
    }

    Ok((Table::from_records(&all_rows), stats))
}
