//! Data Transfer Objects for the HTTP API.
//!
//! Request/response shapes specific to the REST surface. The per-page
//! analytics DTOs already derive Serialize and are re-exported from
//! [`crate::api`].

use serde::{Deserialize, Serialize};

pub use crate::api::{
    // Distribution
    CategoryBucket, DistributionData, HourlyBucket,
    // Heatmap
    HeatmapData, HeatmapPeak,
    // Landing
    DatasetInfo,
    // Summary
    DurationStats, FrequencySummary, LabelCount, SummaryData,
};
pub use crate::services::filters::FilterSpec;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub repository: String,
}

/// Response for the dataset listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetListResponse {
    pub datasets: Vec<DatasetInfo>,
    pub total: usize,
}

/// Request body for ingesting a new dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Display name for the dataset
    pub name: String,
    /// Directory of source files; defaults to the configured cache dir
    #[serde(default)]
    pub source_dir: Option<String>,
}

/// Response for dataset ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Job ID for tracking the async processing
    pub job_id: String,
    pub message: String,
}

/// Job status response for async processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub dataset_name: String,
    pub status: String,
    pub logs: Vec<crate::services::job_tracker::LogEntry>,
    /// Set once the job completes successfully.
    pub dataset_id: Option<crate::api::DatasetId>,
}

/// Query parameters for the analytics endpoints: the dashboard filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(flatten)]
    pub filters: FilterSpec,
}

/// Query parameters for the row-listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RowsQuery {
    #[serde(flatten)]
    pub filters: FilterSpec,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

/// One page of enriched rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowsResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// Rows matching the filters, before pagination.
    pub total: usize,
    pub offset: usize,
}

/// Dropdown options for every dashboard filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptionsResponse {
    pub providers: Vec<String>,
    pub sites: Vec<String>,
    pub frequencies: Vec<String>,
    pub customers: Vec<String>,
    pub time_categories: Vec<String>,
}
