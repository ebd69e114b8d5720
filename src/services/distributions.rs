//! Distribution-page aggregates: start-hour histogram and time-of-day
//! category breakdown.

use crate::api::{CategoryBucket, DistributionData, HourlyBucket};
use crate::enrich::{START_TIME_COLUMN, WINDOW_DURATION_COLUMN};
use crate::models::packed_time::{hour_of, parse_packed, time_category};
use crate::models::Table;
use crate::services::{compute_stats, row_counts};

/// Compute the distribution page over an enriched (and possibly filtered)
/// table.
pub fn compute_distribution(table: &Table) -> DistributionData {
    let weights = row_counts(table);

    let mut hourly = [0u64; 24];
    let mut unplottable = 0u64;
    let mut categories: Vec<CategoryBucket> = Vec::new();
    let mut durations: Vec<(f64, u64)> = Vec::new();

    for i in 0..table.height() {
        let weight = weights[i];
        let start = parse_packed(table.cell(i, START_TIME_COLUMN));

        // Categories keep every row, including Unknown and Invalid; the
        // histogram only plots valid clock hours.
        let label = time_category(start).label();
        match categories.iter_mut().find(|c| c.category == label) {
            Some(bucket) => bucket.windows += weight,
            None => categories.push(CategoryBucket {
                category: label.to_string(),
                windows: weight,
            }),
        }

        match hour_of(start) {
            Some(h) if (0..24).contains(&h) => hourly[h as usize] += weight,
            _ => unplottable += weight,
        }

        if let Some(d) = table
            .cell(i, WINDOW_DURATION_COLUMN)
            .and_then(|c| c.trim().parse::<f64>().ok())
        {
            durations.push((d, weight));
        }
    }

    DistributionData {
        hourly: hourly
            .iter()
            .enumerate()
            .filter(|(_, &windows)| windows > 0)
            .map(|(hour, &windows)| HourlyBucket {
                hour: hour as u8,
                windows,
            })
            .collect(),
        categories,
        duration_stats: compute_stats(&durations),
        unplottable_windows: unplottable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{enrich_table, END_TIME_COLUMN};

    fn row(start: Option<&str>, end: &str, count: &str) -> Vec<(String, Option<String>)> {
        vec![
            (
                START_TIME_COLUMN.to_string(),
                start.map(str::to_string),
            ),
            (END_TIME_COLUMN.to_string(), Some(end.to_string())),
            ("row_count".to_string(), Some(count.to_string())),
        ]
    }

    fn sample() -> Table {
        enrich_table(&Table::from_records(&[
            row(Some("830"), "1700", "2"),
            row(Some("845"), "900", "1"),
            row(Some("2330"), "30", "1"),
            row(None, "900", "4"),
        ]))
    }

    #[test]
    fn test_hourly_histogram_weights_by_row_count() {
        let data = compute_distribution(&sample());
        let eight = data.hourly.iter().find(|b| b.hour == 8).unwrap();
        assert_eq!(eight.windows, 3);
        let late = data.hourly.iter().find(|b| b.hour == 23).unwrap();
        assert_eq!(late.windows, 1);
    }

    #[test]
    fn test_rows_without_start_time_are_counted_separately() {
        let data = compute_distribution(&sample());
        assert_eq!(data.unplottable_windows, 4);
        let unknown = data
            .categories
            .iter()
            .find(|c| c.category == "Unknown")
            .unwrap();
        assert_eq!(unknown.windows, 4);
    }

    #[test]
    fn test_categories_cover_all_windows() {
        let data = compute_distribution(&sample());
        let total: u64 = data.categories.iter().map(|c| c.windows).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn test_invalid_hours_do_not_panic() {
        let table = enrich_table(&Table::from_records(&[row(Some("2460"), "30", "1")]));
        let data = compute_distribution(&table);
        assert_eq!(data.unplottable_windows, 1);
        assert_eq!(data.categories[0].category, "Invalid Time");
    }
}
