//! Integration tests for the analytics services over a realistic counted
//! dataset, the way the HTTP handlers drive them: enrich, filter, compute.

use adx_rust::enrich::{enrich_table, END_TIME_COLUMN, START_TIME_COLUMN, TIME_CATEGORY_COLUMN};
use adx_rust::models::Table;
use adx_rust::services::distributions::compute_distribution;
use adx_rust::services::filters::{apply_filters, FilterSpec};
use adx_rust::services::heatmap::compute_heatmap;
use adx_rust::services::summary::compute_summary;

fn counted_row(
    provider: &str,
    site: Option<&str>,
    frequency: &str,
    plan: &str,
    start: &str,
    end: &str,
    count: &str,
) -> Vec<(String, Option<String>)> {
    vec![
        ("collection_frequency".to_string(), Some(frequency.to_string())),
        ("hourly_collection_plan_id".to_string(), Some(plan.to_string())),
        ("provider".to_string(), Some(provider.to_string())),
        ("site".to_string(), site.map(str::to_string)),
        (START_TIME_COLUMN.to_string(), Some(start.to_string())),
        (END_TIME_COLUMN.to_string(), Some(end.to_string())),
        ("row_count".to_string(), Some(count.to_string())),
    ]
}

fn dataset() -> Table {
    enrich_table(&Table::from_records(&[
        counted_row("P1", Some("S1"), "daily", "1", "530", "900", "10"),
        counted_row("P1", None, "daily", "1", "1400", "1500", "5"),
        counted_row("P2", Some("S2"), "adhoc", "2", "2330", "130", "2"),
        counted_row("P2", Some("S2"), "weekly", "3", "800", "1700", "3"),
    ]))
}

#[test]
fn test_summary_over_full_dataset() {
    let summary = compute_summary(&dataset());

    assert_eq!(summary.total_windows, 20);
    assert_eq!(summary.distinct_rows, 4);
    assert_eq!(summary.providers[0].label, "P1");
    assert_eq!(summary.providers[0].count, 15);

    let stats = summary.duration_stats.unwrap();
    assert_eq!(stats.count, 20);
    // 10x210 + 5x60 + 2x120 + 3x540 minutes.
    assert!((stats.sum - (2100.0 + 300.0 + 240.0 + 1620.0)).abs() < 1e-9);
}

#[test]
fn test_filters_restrict_every_view() {
    let spec = FilterSpec {
        provider: Some("P2".to_string()),
        ..Default::default()
    };
    let filtered = apply_filters(&dataset(), &spec);

    let summary = compute_summary(&filtered);
    assert_eq!(summary.total_windows, 5);
    assert_eq!(summary.distinct_rows, 2);

    let distribution = compute_distribution(&filtered);
    let total: u64 = distribution.categories.iter().map(|c| c.windows).sum();
    assert_eq!(total, 5);
}

#[test]
fn test_time_category_filter_uses_derived_column() {
    let spec = FilterSpec {
        time_category: Some("Early Morning (00-06)".to_string()),
        ..Default::default()
    };
    let filtered = apply_filters(&dataset(), &spec);

    assert_eq!(filtered.height(), 1);
    assert_eq!(filtered.cell(0, "provider"), Some("P1"));
    assert_eq!(
        filtered.cell(0, TIME_CATEGORY_COLUMN),
        Some("Early Morning (00-06)")
    );
}

#[test]
fn test_na_site_filter_matches_null_cell() {
    let spec = FilterSpec {
        site: Some("N/A".to_string()),
        ..Default::default()
    };
    let filtered = apply_filters(&dataset(), &spec);

    assert_eq!(filtered.height(), 1);
    assert_eq!(filtered.cell(0, START_TIME_COLUMN), Some("1400"));
}

#[test]
fn test_distribution_buckets() {
    let distribution = compute_distribution(&dataset());

    let five = distribution.hourly.iter().find(|b| b.hour == 5).unwrap();
    assert_eq!(five.windows, 10);
    let fourteen = distribution.hourly.iter().find(|b| b.hour == 14).unwrap();
    assert_eq!(fourteen.windows, 5);
    assert_eq!(distribution.unplottable_windows, 0);

    let evening = distribution
        .categories
        .iter()
        .find(|c| c.category == "Evening (18-24)")
        .unwrap();
    assert_eq!(evening.windows, 2);
}

#[test]
fn test_heatmap_rows_and_rollover() {
    let heatmap = compute_heatmap(&dataset());

    assert_eq!(
        heatmap.row_labels,
        vec!["daily-1", "adhoc-2", "weekly-3"]
    );

    let daily = &heatmap.intensity[0];
    // 05:30-09:00 spans hours 5 through 9.
    assert_eq!(daily[5], 10);
    assert_eq!(daily[9], 10);
    assert_eq!(daily[14], 5);

    let adhoc = &heatmap.intensity[1];
    assert_eq!(adhoc[23], 2);
    assert_eq!(adhoc[0], 2);
    assert_eq!(adhoc[1], 2);
    assert_eq!(adhoc[2], 0);

    let peak = heatmap.peak.unwrap();
    assert_eq!(peak.row_label, "daily-1");
    assert_eq!(peak.windows, 10);
}

#[test]
fn test_empty_filter_result_yields_empty_views() {
    let spec = FilterSpec {
        provider: Some("P9".to_string()),
        ..Default::default()
    };
    let filtered = apply_filters(&dataset(), &spec);

    let summary = compute_summary(&filtered);
    assert_eq!(summary.total_windows, 0);
    assert!(summary.duration_stats.is_none());

    let heatmap = compute_heatmap(&filtered);
    assert!(heatmap.row_labels.is_empty());
    assert!(heatmap.peak.is_none());
}
