//! Summary-page DTOs.

use serde::{Deserialize, Serialize};

/// A label with its total window count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelCount {
    /// Cell text, with null cells shown as `N/A`.
    pub label: String,
    pub count: u64,
}

/// Per-frequency rollup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrequencySummary {
    pub frequency: String,
    pub distinct_rows: usize,
    pub total_windows: u64,
}

/// Descriptive statistics over window durations, weighted by `row_count`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DurationStats {
    pub count: u64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

/// Complete summary-page dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryData {
    /// Sum of `row_count` over the (filtered) table.
    pub total_windows: u64,
    /// Rows in the (filtered) counted table.
    pub distinct_rows: usize,
    pub providers: Vec<LabelCount>,
    pub sites: Vec<LabelCount>,
    pub customers: Vec<LabelCount>,
    /// Ten heaviest raw start times, for the "busiest start times" panel.
    pub top_start_times: Vec<LabelCount>,
    pub frequencies: Vec<FrequencySummary>,
    pub category_breakdown: Vec<LabelCount>,
    /// Absent when no row carries a computable duration.
    pub duration_stats: Option<DurationStats>,
}
