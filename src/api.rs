//! Stable API surface.
//!
//! Identifiers and the per-feature DTOs, re-exported in one place so HTTP
//! handlers and external callers never reach into internal modules.

use serde::{Deserialize, Serialize};

/// Strongly-typed identifier for a stored dataset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetId(pub i64);

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub use crate::routes::distribution::{CategoryBucket, DistributionData, HourlyBucket};
pub use crate::routes::heatmap::{HeatmapData, HeatmapPeak};
pub use crate::routes::landing::DatasetInfo;
pub use crate::routes::summary::{DurationStats, FrequencySummary, LabelCount, SummaryData};
