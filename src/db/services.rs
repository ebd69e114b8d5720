//! High-level dataset service layer.
//!
//! Repository-agnostic operations that carry the business rules every
//! backend must share: checksum-based deduplication and storage of the raw
//! counted table only.

use tracing::{info, warn};

use crate::api::DatasetId;
use crate::db::checksum::calculate_checksum;
use crate::db::models::NewDataset;
use crate::db::repository::{DatasetRepository, RepositoryError, RepositoryResult};
use crate::grouping::GroupReport;
use crate::ingest::FileStats;
use crate::io::write_table_csv_bytes;
use crate::models::Table;

/// Outcome of a deduplicated store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// A new dataset was created.
    Created(DatasetId),
    /// An identical dataset already existed; nothing was stored.
    Duplicate(DatasetId),
}

impl StoreOutcome {
    pub fn dataset_id(&self) -> DatasetId {
        match self {
            StoreOutcome::Created(id) | StoreOutcome::Duplicate(id) => *id,
        }
    }
}

/// Store a counted table unless an identical one already exists.
///
/// Identity is the SHA-256 of the table's CSV rendering, so re-running the
/// same ingest batch is a no-op rather than a second copy.
pub async fn store_dataset_deduplicated(
    repo: &dyn DatasetRepository,
    name: impl Into<String>,
    table: Table,
    source_files: Vec<FileStats>,
    report: GroupReport,
) -> RepositoryResult<StoreOutcome> {
    let csv_bytes = write_table_csv_bytes(&table)
        .map_err(|e| RepositoryError::storage(format!("Failed to render dataset CSV: {}", e)))?;
    let checksum = calculate_checksum(&csv_bytes);

    if let Some(existing) = repo.find_by_checksum(&checksum).await? {
        warn!(dataset_id = %existing, %checksum, "identical dataset already stored, skipping");
        return Ok(StoreOutcome::Duplicate(existing));
    }

    let dataset_id = repo
        .store_dataset(NewDataset {
            name: name.into(),
            table,
            checksum: checksum.clone(),
            source_files,
            report,
        })
        .await?;
    info!(dataset_id = %dataset_id, %checksum, "stored new dataset");
    Ok(StoreOutcome::Created(dataset_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;

    fn counted_table(cell: &str) -> Table {
        Table::from_records(&[vec![
            ("provider".to_string(), Some(cell.to_string())),
            ("row_count".to_string(), Some("3".to_string())),
        ]])
    }

    fn report() -> GroupReport {
        GroupReport {
            input_rows: 3,
            distinct_rows: 1,
        }
    }

    #[tokio::test]
    async fn test_identical_content_is_deduplicated() {
        let repo = LocalRepository::new();

        let first = store_dataset_deduplicated(&repo, "a", counted_table("P"), vec![], report())
            .await
            .unwrap();
        let second = store_dataset_deduplicated(&repo, "b", counted_table("P"), vec![], report())
            .await
            .unwrap();

        assert!(matches!(first, StoreOutcome::Created(_)));
        assert!(matches!(second, StoreOutcome::Duplicate(_)));
        assert_eq!(first.dataset_id(), second.dataset_id());
        assert_eq!(repo.dataset_count(), 1);
    }

    #[tokio::test]
    async fn test_distinct_content_stores_twice() {
        let repo = LocalRepository::new();

        store_dataset_deduplicated(&repo, "a", counted_table("P1"), vec![], report())
            .await
            .unwrap();
        store_dataset_deduplicated(&repo, "b", counted_table("P2"), vec![], report())
            .await
            .unwrap();

        assert_eq!(repo.dataset_count(), 2);
    }
}
