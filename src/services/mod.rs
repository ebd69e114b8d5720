//! Analytics and processing services.
//!
//! Pure compute functions over the enriched counted table, one module per
//! dashboard page, plus the background ingest pipeline used by the HTTP
//! layer. Every aggregate here weights by `row_count`: a counted row stands
//! for that many scheduling windows.

pub mod distributions;
pub mod filters;
pub mod heatmap;
pub mod summary;

#[cfg(feature = "http-server")]
pub mod dataset_processor;
#[cfg(feature = "http-server")]
pub mod job_tracker;

use crate::api::DurationStats;
use crate::grouping::ROW_COUNT_COLUMN;
use crate::models::Table;

/// Window multiplicity of each counted row.
///
/// Tables without a `row_count` column (or with unparsable cells) fall back
/// to a weight of 1 per row.
pub fn row_counts(table: &Table) -> Vec<u64> {
    (0..table.height())
        .map(|i| {
            table
                .cell(i, ROW_COUNT_COLUMN)
                .and_then(|c| c.trim().parse::<u64>().ok())
                .unwrap_or(1)
        })
        .collect()
}

/// Label form of a nullable cell for grouping and display.
pub fn label_or_na(cell: Option<&str>) -> String {
    cell.unwrap_or("N/A").to_string()
}

/// Weighted descriptive statistics over `(value, weight)` pairs.
///
/// `count` is the total weight; mean, median and standard deviation treat
/// each pair as `weight` repeated observations. Returns `None` when the
/// total weight is zero.
pub fn compute_stats(values: &[(f64, u64)]) -> Option<DurationStats> {
    let count: u64 = values.iter().map(|(_, w)| w).sum();
    if count == 0 {
        return None;
    }

    let sum: f64 = values.iter().map(|(v, w)| v * *w as f64).sum();
    let mean = sum / count as f64;

    let mut sorted: Vec<(f64, u64)> = values.iter().filter(|(_, w)| *w > 0).copied().collect();
    sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // Median of the expanded multiset, found by walking cumulative weights.
    let median = {
        let lower_target = (count - 1) / 2;
        let upper_target = count / 2;
        let mut cumulative = 0u64;
        let mut lower = None;
        let mut upper = None;
        for (v, w) in &sorted {
            cumulative += w;
            if lower.is_none() && cumulative > lower_target {
                lower = Some(*v);
            }
            if upper.is_none() && cumulative > upper_target {
                upper = Some(*v);
                break;
            }
        }
        match (lower, upper) {
            (Some(a), Some(b)) => (a + b) / 2.0,
            _ => mean,
        }
    };

    let variance = values
        .iter()
        .map(|(v, w)| {
            let diff = v - mean;
            diff * diff * *w as f64
        })
        .sum::<f64>()
        / count as f64;

    let min = sorted.first().map(|(v, _)| *v).unwrap_or(0.0);
    let max = sorted.last().map(|(v, _)| *v).unwrap_or(0.0);

    Some(DurationStats {
        count,
        mean,
        median,
        std_dev: variance.sqrt(),
        min,
        max,
        sum,
    })
}
