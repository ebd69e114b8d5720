//! Derived-field enrichment.
//!
//! Appends presentation columns computed from the stored window times.
//! Derived columns exist only on the in-memory copy handed to analytics and
//! API responses; the stored dataset stays raw so re-deriving with new rules
//! never requires re-ingesting.

use crate::models::packed_time::{decimal_hour, duration_minutes, parse_packed, time_category};
use crate::models::Table;

/// Stored column holding the window's packed start time.
pub const START_TIME_COLUMN: &str = "timeBox_startTime_time";
/// Stored column holding the window's packed end time.
pub const END_TIME_COLUMN: &str = "timeBox_endTime_time";

pub const TIME_CATEGORY_COLUMN: &str = "time_category";
pub const DECIMAL_HOUR_COLUMN: &str = "decimal_hour";
pub const WINDOW_DURATION_COLUMN: &str = "window_duration_minutes";

fn packed_column(table: &Table, column: &str) -> Vec<Option<i64>> {
    (0..table.height())
        .map(|i| parse_packed(table.cell(i, column)))
        .collect()
}

/// Append the derived time columns to a copy of `table`.
///
/// Works on any table carrying the window-time columns; rows whose start
/// time is absent get the `Unknown` category and null numeric cells. Tables
/// without those columns pass through with all-null derived cells.
pub fn enrich_table(table: &Table) -> Table {
    let starts = packed_column(table, START_TIME_COLUMN);
    let ends = packed_column(table, END_TIME_COLUMN);

    let mut out = table.clone();
    out.push_column(
        TIME_CATEGORY_COLUMN,
        starts
            .iter()
            .map(|&t| Some(time_category(t).label().to_string()))
            .collect(),
    );
    out.push_column(
        DECIMAL_HOUR_COLUMN,
        starts
            .iter()
            .map(|&t| decimal_hour(t).map(|h| h.to_string()))
            .collect(),
    );
    out.push_column(
        WINDOW_DURATION_COLUMN,
        starts
            .iter()
            .zip(&ends)
            .map(|(&s, &e)| duration_minutes(s, e).map(|m| m.to_string()))
            .collect(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windowed_table() -> Table {
        let records = vec![
            vec![
                (START_TIME_COLUMN.to_string(), Some("530".to_string())),
                (END_TIME_COLUMN.to_string(), Some("1700".to_string())),
            ],
            vec![
                (START_TIME_COLUMN.to_string(), Some("2330".to_string())),
                (END_TIME_COLUMN.to_string(), Some("30".to_string())),
            ],
            vec![
                (START_TIME_COLUMN.to_string(), None),
                (END_TIME_COLUMN.to_string(), Some("900".to_string())),
            ],
        ];
        Table::from_records(&records)
    }

    #[test]
    fn test_enrich_appends_derived_columns() {
        let enriched = enrich_table(&windowed_table());

        assert_eq!(enriched.cell(0, TIME_CATEGORY_COLUMN), Some("Early Morning (00-06)"));
        assert_eq!(enriched.cell(0, DECIMAL_HOUR_COLUMN), Some("5.5"));
        assert_eq!(enriched.cell(0, WINDOW_DURATION_COLUMN), Some("690"));
    }

    #[test]
    fn test_enrich_midnight_rollover() {
        let enriched = enrich_table(&windowed_table());
        assert_eq!(enriched.cell(1, WINDOW_DURATION_COLUMN), Some("60"));
        assert_eq!(enriched.cell(1, TIME_CATEGORY_COLUMN), Some("Evening (18-24)"));
    }

    #[test]
    fn test_enrich_missing_start_time() {
        let enriched = enrich_table(&windowed_table());
        assert_eq!(enriched.cell(2, TIME_CATEGORY_COLUMN), Some("Unknown"));
        assert_eq!(enriched.cell(2, DECIMAL_HOUR_COLUMN), None);
        assert_eq!(enriched.cell(2, WINDOW_DURATION_COLUMN), None);
    }

    #[test]
    fn test_enrich_leaves_input_untouched() {
        let table = windowed_table();
        let width_before = table.width();
        let enriched = enrich_table(&table);

        assert_eq!(table.width(), width_before);
        assert_eq!(enriched.width(), width_before + 3);
    }

    #[test]
    fn test_enrich_table_without_window_columns() {
        let records = vec![vec![("provider".to_string(), Some("P".to_string()))]];
        let enriched = enrich_table(&Table::from_records(&records));

        assert_eq!(enriched.cell(0, TIME_CATEGORY_COLUMN), Some("Unknown"));
        assert_eq!(enriched.cell(0, WINDOW_DURATION_COLUMN), None);
    }
}
