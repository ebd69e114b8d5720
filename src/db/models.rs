//! Storage-layer dataset types.

use crate::api::DatasetInfo;
use crate::grouping::GroupReport;
use crate::ingest::FileStats;
use crate::models::Table;

/// A counted dataset ready to be stored.
#[derive(Debug, Clone)]
pub struct NewDataset {
    /// Display name, usually derived from the ingest source.
    pub name: String,
    /// Counted table (distinct rows plus `row_count`).
    pub table: Table,
    /// SHA-256 of the table's CSV rendering, used for deduplication.
    pub checksum: String,
    /// Per-file ingest counters.
    pub source_files: Vec<FileStats>,
    /// Grouping totals for the batch.
    pub report: GroupReport,
}

/// A stored dataset as returned by the repository.
#[derive(Debug, Clone)]
pub struct StoredDataset {
    pub info: DatasetInfo,
    pub table: Table,
}
