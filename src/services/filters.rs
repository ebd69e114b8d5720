//! Dashboard row filters.
//!
//! Equality filters over the enriched table's text cells. The literal
//! `"N/A"` selects rows whose cell is null, matching how the dashboard
//! displays missing values. A filter naming a column the table does not
//! have is ignored rather than matching nothing: older datasets predate
//! some columns.

use crate::enrich::TIME_CATEGORY_COLUMN;
use crate::models::Table;

/// Filter value shown for (and matching) null cells.
pub const NA_LABEL: &str = "N/A";

/// The equality filters the dashboard exposes. `None` means "all".
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct FilterSpec {
    pub provider: Option<String>,
    pub site: Option<String>,
    pub frequency: Option<String>,
    pub customer: Option<String>,
    pub collection: Option<String>,
    pub priority: Option<String>,
    pub customer_site_code: Option<String>,
    pub start_date: Option<String>,
    pub time_category: Option<String>,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.provider.is_none()
            && self.site.is_none()
            && self.frequency.is_none()
            && self.customer.is_none()
            && self.collection.is_none()
            && self.priority.is_none()
            && self.customer_site_code.is_none()
            && self.start_date.is_none()
            && self.time_category.is_none()
    }

    fn criteria(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        if let Some(v) = &self.provider {
            out.push(("provider", v.as_str()));
        }
        if let Some(v) = &self.site {
            out.push(("site", v.as_str()));
        }
        if let Some(v) = &self.frequency {
            out.push(("collection_frequency", v.as_str()));
        }
        if let Some(v) = &self.customer {
            out.push(("customerCollection_customer", v.as_str()));
        }
        if let Some(v) = &self.collection {
            out.push(("customerCollection_name", v.as_str()));
        }
        if let Some(v) = &self.priority {
            out.push(("siteHierarchy_priority", v.as_str()));
        }
        if let Some(v) = &self.customer_site_code {
            out.push(("siteHierarchy_customerSiteCode", v.as_str()));
        }
        if let Some(v) = &self.start_date {
            out.push(("timeBox_startTime_date", v.as_str()));
        }
        if let Some(v) = &self.time_category {
            out.push((TIME_CATEGORY_COLUMN, v.as_str()));
        }
        out
    }
}

fn cell_matches(cell: Option<&str>, wanted: &str) -> bool {
    match cell {
        Some(text) => text == wanted,
        None => wanted == NA_LABEL,
    }
}

/// Rows of `table` passing every set filter, as a new table.
pub fn apply_filters(table: &Table, spec: &FilterSpec) -> Table {
    if spec.is_empty() {
        return table.clone();
    }

    let criteria: Vec<(&str, &str)> = spec
        .criteria()
        .into_iter()
        .filter(|(column, _)| table.has_column(column))
        .collect();

    let indices: Vec<usize> = (0..table.height())
        .filter(|&i| {
            criteria
                .iter()
                .all(|(column, wanted)| cell_matches(table.cell(i, column), wanted))
        })
        .collect();
    table.select_rows(&indices)
}

/// Distinct values of a column in first-appearance order, nulls as `N/A`.
///
/// Feeds the dashboard's filter dropdowns.
pub fn filter_options(table: &Table, column: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for i in 0..table.height() {
        let label = super::label_or_na(table.cell(i, column));
        if seen.insert(label.clone()) {
            out.push(label);
        }
    }
    out
}
