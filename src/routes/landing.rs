//! Landing-page DTOs: dataset catalogue entries.

use serde::{Deserialize, Serialize};

use crate::api::DatasetId;
use crate::ingest::FileStats;

/// Metadata for one stored dataset, as listed on the landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub dataset_id: DatasetId,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// SHA-256 of the counted table's CSV rendering.
    pub checksum: String,
    /// Per-file counters from the ingest batch.
    pub source_files: Vec<FileStats>,
    /// Rows in the counted table.
    pub distinct_rows: usize,
    /// Sum of all `row_count` values, i.e. rows before deduplication.
    pub total_rows: u64,
}
