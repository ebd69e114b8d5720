//! Repository abstraction for stored datasets.
//!
//! Defines the error surface and the trait every storage backend implements.
//! Handlers and services only see [`DatasetRepository`], so backends can be
//! swapped without touching them.

use async_trait::async_trait;
use std::fmt;

use crate::api::{DatasetId, DatasetInfo};
use crate::db::models::{NewDataset, StoredDataset};

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context attached to repository errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "fetch_dataset")
    pub operation: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Requested dataset was not found.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Data failed validation before or after storage.
    #[error("Validation error: {message} {context}")]
    Validation {
        message: String,
        context: ErrorContext,
    },

    /// Backend storage failure.
    #[error("Storage error: {message} {context}")]
    Storage {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }
}

/// Storage backend for counted datasets.
///
/// Stored tables are always the raw counted form; derived columns are
/// appended on read by the analytics layer, never persisted.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Store a new dataset and return its assigned ID.
    async fn store_dataset(&self, dataset: NewDataset) -> RepositoryResult<DatasetId>;

    /// Metadata for every stored dataset, newest first.
    async fn list_datasets(&self) -> RepositoryResult<Vec<DatasetInfo>>;

    /// Full dataset (metadata plus counted table) by ID.
    async fn fetch_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<StoredDataset>;

    /// Remove a dataset. Deleting an unknown ID is a `NotFound` error.
    async fn delete_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<()>;

    /// ID of the dataset with this content checksum, if one exists.
    async fn find_by_checksum(&self, checksum: &str) -> RepositoryResult<Option<DatasetId>>;

    /// Backend liveness probe.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
