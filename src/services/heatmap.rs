//! Heatmap-page aggregates: per-plan hourly activity.

use std::collections::HashMap;

use crate::api::{HeatmapData, HeatmapPeak};
use crate::enrich::{END_TIME_COLUMN, START_TIME_COLUMN};
use crate::models::packed_time::{hour_of, parse_packed};
use crate::models::Table;
use crate::services::{label_or_na, row_counts};

/// Hours of the day a window spans, inclusive of both endpoint hours.
///
/// An end hour before the start hour wraps past midnight once. Returns
/// `None` when either hour falls outside the clock, so malformed packed
/// times never smear across the matrix.
fn active_hours(start: i64, end: i64) -> Option<Vec<usize>> {
    let (start_hour, end_hour) = (hour_of(Some(start))?, hour_of(Some(end))?);
    if !(0..24).contains(&start_hour) || !(0..24).contains(&end_hour) {
        return None;
    }
    let (s, e) = (start_hour as usize, end_hour as usize);
    if s <= e {
        Some((s..=e).collect())
    } else {
        Some((s..24).chain(0..=e).collect())
    }
}

/// Compute the plan-by-hour heatmap over an enriched (and possibly
/// filtered) table.
pub fn compute_heatmap(table: &Table) -> HeatmapData {
    let weights = row_counts(table);

    let mut row_labels: Vec<String> = Vec::new();
    let mut row_index: HashMap<String, usize> = HashMap::new();
    let mut intensity: Vec<[u64; 24]> = Vec::new();

    for i in 0..table.height() {
        let label = format!(
            "{}-{}",
            label_or_na(table.cell(i, "collection_frequency")),
            label_or_na(table.cell(i, "hourly_collection_plan_id")),
        );
        let row = *row_index.entry(label.clone()).or_insert_with(|| {
            row_labels.push(label);
            intensity.push([0u64; 24]);
            intensity.len() - 1
        });

        let start = parse_packed(table.cell(i, START_TIME_COLUMN));
        let end = parse_packed(table.cell(i, END_TIME_COLUMN));
        let hours = match (start, end) {
            (Some(s), Some(e)) => active_hours(s, e),
            _ => None,
        };
        if let Some(hours) = hours {
            for h in hours {
                intensity[row][h] += weights[i];
            }
        }
    }

    let mut peak: Option<HeatmapPeak> = None;
    let mut total = 0u64;
    for (row, cells) in intensity.iter().enumerate() {
        for (hour, &windows) in cells.iter().enumerate() {
            total += windows;
            if windows > 0 && peak.as_ref().map_or(true, |p| windows > p.windows) {
                peak = Some(HeatmapPeak {
                    row_label: row_labels[row].clone(),
                    hour: hour as u8,
                    windows,
                });
            }
        }
    }

    HeatmapData {
        active_hours: intensity
            .iter()
            .map(|cells| cells.iter().filter(|&&w| w > 0).count() as u32)
            .collect(),
        intensity: intensity.into_iter().map(|cells| cells.to_vec()).collect(),
        row_labels,
        hour_labels: (0..24).collect(),
        total_windows: total,
        peak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        frequency: &str,
        plan: &str,
        start: &str,
        end: &str,
        count: &str,
    ) -> Vec<(String, Option<String>)> {
        vec![
            ("collection_frequency".to_string(), Some(frequency.to_string())),
            ("hourly_collection_plan_id".to_string(), Some(plan.to_string())),
            (START_TIME_COLUMN.to_string(), Some(start.to_string())),
            (END_TIME_COLUMN.to_string(), Some(end.to_string())),
            ("row_count".to_string(), Some(count.to_string())),
        ]
    }

    #[test]
    fn test_rows_keyed_by_plan_in_first_appearance_order() {
        let table = Table::from_records(&[
            row("daily", "2", "800", "900", "1"),
            row("adhoc", "1", "800", "900", "1"),
            row("daily", "2", "1000", "1100", "1"),
        ]);
        let data = compute_heatmap(&table);

        assert_eq!(data.row_labels, vec!["daily-2", "adhoc-1"]);
        assert_eq!(data.intensity.len(), 2);
    }

    #[test]
    fn test_window_marks_every_spanned_hour() {
        let table = Table::from_records(&[row("daily", "1", "830", "1115", "2")]);
        let data = compute_heatmap(&table);

        assert_eq!(data.intensity[0][8], 2);
        assert_eq!(data.intensity[0][9], 2);
        assert_eq!(data.intensity[0][11], 2);
        assert_eq!(data.intensity[0][12], 0);
        assert_eq!(data.active_hours[0], 4);
    }

    #[test]
    fn test_midnight_rollover_wraps_hours() {
        let table = Table::from_records(&[row("daily", "1", "2330", "130", "1")]);
        let data = compute_heatmap(&table);

        assert_eq!(data.intensity[0][23], 1);
        assert_eq!(data.intensity[0][0], 1);
        assert_eq!(data.intensity[0][1], 1);
        assert_eq!(data.intensity[0][2], 0);
    }

    #[test]
    fn test_out_of_range_hours_are_skipped() {
        let table = Table::from_records(&[row("daily", "1", "2460", "2530", "5")]);
        let data = compute_heatmap(&table);

        assert_eq!(data.total_windows, 0);
        assert!(data.peak.is_none());
        // The plan still appears as an all-zero row.
        assert_eq!(data.row_labels, vec!["daily-1"]);
    }

    #[test]
    fn test_peak_cell() {
        let table = Table::from_records(&[
            row("daily", "1", "800", "900", "1"),
            row("daily", "1", "800", "830", "4"),
        ]);
        let data = compute_heatmap(&table);
        let peak = data.peak.unwrap();

        assert_eq!(peak.hour, 8);
        assert_eq!(peak.windows, 5);
        assert_eq!(peak.row_label, "daily-1");
    }
}
