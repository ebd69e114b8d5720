//! Summary-page aggregates.

use std::collections::HashMap;

use crate::api::{FrequencySummary, LabelCount, SummaryData};
use crate::enrich::{START_TIME_COLUMN, TIME_CATEGORY_COLUMN, WINDOW_DURATION_COLUMN};
use crate::models::Table;
use crate::services::{compute_stats, label_or_na, row_counts};

/// Window counts per distinct value of `column`, heaviest first with
/// first-appearance tie-break.
fn count_by(table: &Table, weights: &[u64], column: &str) -> Vec<LabelCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for i in 0..table.height() {
        let label = label_or_na(table.cell(i, column));
        if !counts.contains_key(&label) {
            order.push(label.clone());
        }
        *counts.entry(label).or_insert(0) += weights[i];
    }

    let mut out: Vec<LabelCount> = order
        .into_iter()
        .map(|label| {
            let count = counts[&label];
            LabelCount { label, count }
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

fn duration_pairs(table: &Table, weights: &[u64]) -> Vec<(f64, u64)> {
    (0..table.height())
        .filter_map(|i| {
            table
                .cell(i, WINDOW_DURATION_COLUMN)
                .and_then(|c| c.trim().parse::<f64>().ok())
                .map(|d| (d, weights[i]))
        })
        .collect()
}

/// Compute the summary page over an enriched (and possibly filtered) table.
pub fn compute_summary(table: &Table) -> SummaryData {
    let weights = row_counts(table);
    let total_windows: u64 = weights.iter().sum();

    let mut freq_order: Vec<String> = Vec::new();
    let mut freq_rollup: HashMap<String, (usize, u64)> = HashMap::new();
    for i in 0..table.height() {
        let label = label_or_na(table.cell(i, "collection_frequency"));
        if !freq_rollup.contains_key(&label) {
            freq_order.push(label.clone());
        }
        let entry = freq_rollup.entry(label).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += weights[i];
    }
    let mut frequencies: Vec<FrequencySummary> = freq_order
        .into_iter()
        .map(|frequency| {
            let (distinct_rows, total) = freq_rollup[&frequency];
            FrequencySummary {
                frequency,
                distinct_rows,
                total_windows: total,
            }
        })
        .collect();
    frequencies.sort_by(|a, b| b.total_windows.cmp(&a.total_windows));

    let mut top_start_times = count_by(table, &weights, START_TIME_COLUMN);
    top_start_times.truncate(10);

    SummaryData {
        total_windows,
        distinct_rows: table.height(),
        providers: count_by(table, &weights, "provider"),
        sites: count_by(table, &weights, "site"),
        customers: count_by(table, &weights, "customerCollection_customer"),
        top_start_times,
        frequencies,
        category_breakdown: count_by(table, &weights, TIME_CATEGORY_COLUMN),
        duration_stats: compute_stats(&duration_pairs(table, &weights)),
    }
}
