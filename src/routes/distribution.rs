//! Distribution-page DTOs.

use serde::{Deserialize, Serialize};

use crate::routes::summary::DurationStats;

/// Window count for one hour of the day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourlyBucket {
    /// Hour of day, `0..=23`.
    pub hour: u8,
    pub windows: u64,
}

/// Window count for one time-of-day category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryBucket {
    /// Category label, e.g. `Morning (06-12)`.
    pub category: String,
    pub windows: u64,
}

/// Complete distribution-page dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionData {
    /// Start-hour histogram. Rows without a valid start hour are excluded.
    pub hourly: Vec<HourlyBucket>,
    /// Category breakdown, including `Unknown` and `Invalid Time` rows.
    pub categories: Vec<CategoryBucket>,
    pub duration_stats: Option<DurationStats>,
    /// Windows excluded from the hourly histogram.
    pub unplottable_windows: u64,
}
