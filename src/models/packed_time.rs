//! Packed `HHMM` time-of-day helpers.
//!
//! Scheduling windows carry times as packed integers (`1430` = 14:30). All
//! functions here are pure and total over nullable inputs; validation rules
//! intentionally differ between extraction (`hour_of` accepts anything) and
//! display (`format_hhmm` rejects out-of-range values) because downstream
//! categorization tolerates values that formatting rejects.

use serde::{Deserialize, Serialize};

/// Time-of-day bucket derived from the hour component of a packed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeCategory {
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
    /// Packed time whose hour component falls outside `[0, 24)`.
    Invalid,
    /// No time available at all.
    Unknown,
}

impl TimeCategory {
    /// Human-readable label matching the dashboard's legend.
    pub fn label(&self) -> &'static str {
        match self {
            TimeCategory::EarlyMorning => "Early Morning (00-06)",
            TimeCategory::Morning => "Morning (06-12)",
            TimeCategory::Afternoon => "Afternoon (12-18)",
            TimeCategory::Evening => "Evening (18-24)",
            TimeCategory::Invalid => "Invalid Time",
            TimeCategory::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for TimeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Hour component of a packed time. Performs no bounds validation.
pub fn hour_of(t: Option<i64>) -> Option<i64> {
    t.map(|v| v.div_euclid(100))
}

/// Minute component of a packed time. Performs no bounds validation.
pub fn minute_of(t: Option<i64>) -> Option<i64> {
    t.map(|v| v.rem_euclid(100))
}

/// Format a packed time as zero-padded `HH:MM`.
///
/// Returns `None` for null input or when hours > 23 or minutes > 59. This is
/// the only place packed times are range-checked.
pub fn format_hhmm(t: Option<i64>) -> Option<String> {
    let v = t?;
    let hours = v.div_euclid(100);
    let minutes = v.rem_euclid(100);
    if !(0..=23).contains(&hours) || minutes > 59 {
        return None;
    }
    Some(format!("{:02}:{:02}", hours, minutes))
}

/// Decimal-hour representation (`1430` -> 14.5) for plotting.
pub fn decimal_hour(t: Option<i64>) -> Option<f64> {
    let v = t?;
    let hours = v.div_euclid(100);
    let minutes = v.rem_euclid(100);
    Some(hours as f64 + minutes as f64 / 60.0)
}

/// Bucket a packed time into a six-hour period of the day.
pub fn time_category(t: Option<i64>) -> TimeCategory {
    let hours = match hour_of(t) {
        Some(h) => h,
        None => return TimeCategory::Unknown,
    };
    match hours {
        0..=5 => TimeCategory::EarlyMorning,
        6..=11 => TimeCategory::Morning,
        12..=17 => TimeCategory::Afternoon,
        18..=23 => TimeCategory::Evening,
        _ => TimeCategory::Invalid,
    }
}

/// Window length in minutes between two packed times.
///
/// When the end falls before the start the window is assumed to cross
/// midnight exactly once and a full day is added. Multi-day windows are a
/// boundary assumption: they would silently yield a too-small result.
pub fn duration_minutes(start: Option<i64>, end: Option<i64>) -> Option<i64> {
    let start = start?;
    let end = end?;
    let start_minutes = start.div_euclid(100) * 60 + start.rem_euclid(100);
    let mut end_minutes = end.div_euclid(100) * 60 + end.rem_euclid(100);
    if end_minutes < start_minutes {
        end_minutes += 24 * 60;
    }
    Some(end_minutes - start_minutes)
}

/// Parse a packed time out of a text cell.
///
/// Tabular interchange keeps every column as text, so packed times come back
/// as `"500"` or occasionally `"500.0"`; both parse to 500.
pub fn parse_packed(cell: Option<&str>) -> Option<i64> {
    let text = cell?.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(v) = text.parse::<i64>() {
        return Some(v);
    }
    text.parse::<f64>().ok().map(|f| f.trunc() as i64)
}
