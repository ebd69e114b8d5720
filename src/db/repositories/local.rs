//! In-memory local repository implementation.
//!
//! Stores datasets in a HashMap behind a lock. Deterministic and isolated,
//! suitable for unit tests and single-process deployments where the counted
//! tables fit comfortably in memory.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{DatasetId, DatasetInfo};
use crate::db::models::{NewDataset, StoredDataset};
use crate::db::repository::{
    DatasetRepository, ErrorContext, RepositoryError, RepositoryResult,
};

/// In-memory local repository.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    datasets: HashMap<DatasetId, StoredDataset>,
    next_dataset_id: DatasetId,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            datasets: HashMap::new(),
            next_dataset_id: DatasetId(1),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Flip the health flag, used by tests to simulate backend failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    pub fn dataset_count(&self) -> usize {
        self.data.read().datasets.len()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetRepository for LocalRepository {
    async fn store_dataset(&self, dataset: NewDataset) -> RepositoryResult<DatasetId> {
        if dataset.table.is_empty() {
            return Err(RepositoryError::validation(
                "Refusing to store an empty dataset",
            ));
        }

        let mut data = self.data.write();
        let dataset_id = data.next_dataset_id;
        data.next_dataset_id = DatasetId(dataset_id.0 + 1);

        let info = DatasetInfo {
            dataset_id,
            name: dataset.name,
            created_at: chrono::Utc::now(),
            checksum: dataset.checksum,
            source_files: dataset.source_files,
            distinct_rows: dataset.report.distinct_rows,
            total_rows: dataset.report.input_rows,
        };
        data.datasets.insert(
            dataset_id,
            StoredDataset {
                info,
                table: dataset.table,
            },
        );
        Ok(dataset_id)
    }

    async fn list_datasets(&self) -> RepositoryResult<Vec<DatasetInfo>> {
        let data = self.data.read();
        let mut infos: Vec<DatasetInfo> =
            data.datasets.values().map(|d| d.info.clone()).collect();
        infos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(infos)
    }

    async fn fetch_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<StoredDataset> {
        self.data
            .read()
            .datasets
            .get(&dataset_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "Dataset does not exist",
                    ErrorContext::new("fetch_dataset").with_entity_id(dataset_id),
                )
            })
    }

    async fn delete_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<()> {
        if self.data.write().datasets.remove(&dataset_id).is_none() {
            return Err(RepositoryError::not_found_with_context(
                "Dataset does not exist",
                ErrorContext::new("delete_dataset").with_entity_id(dataset_id),
            ));
        }
        Ok(())
    }

    async fn find_by_checksum(&self, checksum: &str) -> RepositoryResult<Option<DatasetId>> {
        Ok(self
            .data
            .read()
            .datasets
            .values()
            .find(|d| d.info.checksum == checksum)
            .map(|d| d.info.dataset_id))
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }
}
