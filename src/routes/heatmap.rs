//! Heatmap-page DTOs.

use serde::{Deserialize, Serialize};

/// The busiest cell of the heatmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeatmapPeak {
    pub row_label: String,
    pub hour: u8,
    pub windows: u64,
}

/// Plan-by-hour activity matrix.
///
/// One row per collection plan in first-appearance order, one column per
/// hour of day. A cell holds the number of windows active during that hour,
/// weighted by `row_count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapData {
    /// `<frequency>-<planId>` labels, `N/A` parts for null cells.
    pub row_labels: Vec<String>,
    /// Hours of day, always `0..=23`.
    pub hour_labels: Vec<u8>,
    /// `intensity[row][hour]`, same order as the labels.
    pub intensity: Vec<Vec<u64>>,
    /// Hours with any activity, per row.
    pub active_hours: Vec<u32>,
    /// Sum of all cells.
    pub total_windows: u64,
    pub peak: Option<HeatmapPeak>,
}
