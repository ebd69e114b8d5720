//! Record flattening.
//!
//! Converts one nested [`SourceRecord`] (and its owner entries) into flat
//! column/value rows. One row is produced per owner; a record without owners
//! still yields exactly one row with the owner columns explicitly null, so
//! every record expands to `max(1, owners)` rows with a uniform column set.
//!
//! Nested blocks are flattened by a declarative [`BlockSpec`] table: each
//! block contributes prefixed columns, with exactly one extra level of
//! nesting allowed (packed time objects become double-prefixed columns such
//! as `timeBox_startTime_time`). New block shapes are added by data, not by
//! new flattening logic.

use crate::ingest::metadata::FileMetadata;
use crate::models::table::{canonical_text, FlatRow};
use crate::models::SourceRecord;
use serde_json::{Map, Value};

/// Declarative flattening rule for one nested block.
struct BlockSpec {
    /// Column prefix for fields without a rename rule.
    prefix: &'static str,
    /// Positional sub-field renames (`x` -> `provider`, `y` -> `site`).
    renames: &'static [(&'static str, &'static str)],
    /// When set, exactly these fields are emitted (missing ones as null);
    /// otherwise every key of the block passes through in order.
    select: Option<&'static [&'static str]>,
}

/// Provider/site code pair: the two positional sub-fields get semantic
/// names, anything further passes through column-prefixed.
const PROVIDER_SITE_SPEC: BlockSpec = BlockSpec {
    prefix: "providerSiteCode",
    renames: &[("x", "provider"), ("y", "site")],
    select: None,
};

const SITE_HIERARCHY_SPEC: BlockSpec = BlockSpec {
    prefix: "siteHierarchy",
    renames: &[],
    select: Some(&["customer", "customerSiteCode", "priority"]),
};

const TOP_TIME_BOX_SPEC: BlockSpec = BlockSpec {
    prefix: "timeBox",
    renames: &[],
    select: None,
};

const OWNER_COLLECTION_SPEC: BlockSpec = BlockSpec {
    prefix: "customerCollection",
    renames: &[],
    select: None,
};

/// Owner windows use a lowercase prefix so they never collide with the
/// parent record's `timeBox_*` columns.
const OWNER_TIME_BOX_SPEC: BlockSpec = BlockSpec {
    prefix: "timebox",
    renames: &[],
    select: None,
};

/// Owner-specific columns that must be explicitly null on rows emitted for
/// records without owners, so both shapes share one schema.
const OWNER_NULL_COLUMNS: &[&str] = &[
    "customerCollection_id",
    "customerCollection_customer",
    "customerCollection_name",
    "customerCollection_frequency",
    "customerCollection_earliestStartTime",
    "customerCollection_expectedDeliveryTime",
    "customerCollection_hints",
    "customerCollection_status",
    "customerCollection_customerPackagingId",
    "input_filename",
    "input_reference",
];

fn column_name(spec: &BlockSpec, key: &str) -> String {
    for (from, to) in spec.renames {
        if *from == key {
            return (*to).to_string();
        }
    }
    format!("{}_{}", spec.prefix, key)
}

fn push_field(out: &mut FlatRow, base: String, value: Option<&Value>) {
    match value {
        Some(Value::Object(nested)) => {
            // One level of recursion, applied uniformly: sub-keys become
            // double-prefixed columns instead of nesting further.
            for (subkey, subvalue) in nested {
                out.push((format!("{}_{}", base, subkey), canonical_text(subvalue)));
            }
        }
        Some(v) => out.push((base, canonical_text(v))),
        None => out.push((base, None)),
    }
}

fn flatten_block(out: &mut FlatRow, block: &Map<String, Value>, spec: &BlockSpec) {
    match spec.select {
        Some(fields) => {
            for field in fields {
                push_field(out, column_name(spec, field), block.get(*field));
            }
        }
        None => {
            for (key, value) in block {
                push_field(out, column_name(spec, key), Some(value));
            }
        }
    }
}

/// Flatten one scheduling record into `max(1, owners)` rows.
///
/// `meta` carries the frequency tag and plan id parsed from the originating
/// filename; both columns are null when the filename did not match the
/// naming convention. Pure function: no I/O, no logging.
pub fn flatten_record(record: &SourceRecord, meta: &FileMetadata) -> Vec<FlatRow> {
    let mut base: FlatRow = Vec::new();

    base.push(("collection_frequency".to_string(), meta.frequency.clone()));
    base.push((
        "hourly_collection_plan_id".to_string(),
        meta.plan_id.map(|id| id.to_string()),
    ));

    if let Some(block) = &record.provider_site_code {
        flatten_block(&mut base, block, &PROVIDER_SITE_SPEC);
    }
    if let Some(block) = &record.site_hierarchy {
        flatten_block(&mut base, block, &SITE_HIERARCHY_SPEC);
    }

    base.push((
        "requests_count".to_string(),
        Some(if record.request.is_some() { "1" } else { "0" }.to_string()),
    ));
    // Reserved for a block that never appears in current inputs.
    base.push(("enrichment_request_count".to_string(), Some("0".to_string())));

    if let Some(block) = &record.time_box {
        flatten_block(&mut base, block, &TOP_TIME_BOX_SPEC);
    }

    if record.request_owners.is_empty() {
        let mut row = base;
        row.push(("ownerSequence".to_string(), Some("1".to_string())));
        for column in OWNER_NULL_COLUMNS {
            row.push(((*column).to_string(), None));
        }
        row.push(("inputRequest_exists".to_string(), Some("0".to_string())));
        return vec![row];
    }

    let mut rows = Vec::with_capacity(record.request_owners.len());
    for (idx, owner) in record.request_owners.iter().enumerate() {
        let mut row = base.clone();
        row.push(("ownerSequence".to_string(), Some((idx + 1).to_string())));

        if let Some(block) = &owner.customer_collection {
            flatten_block(&mut row, block, &OWNER_COLLECTION_SPEC);
        }

        if let Some(input) = &owner.input {
            row.push((
                "input_filename".to_string(),
                input.get("name").and_then(canonical_text),
            ));
            // Fall back to the input's id only when no reference key exists.
            let reference = if input.contains_key("reference") {
                input.get("reference").and_then(canonical_text)
            } else {
                input.get("id").and_then(canonical_text)
            };
            row.push(("input_reference".to_string(), reference));
        }

        row.push((
            "inputRequest_exists".to_string(),
            Some(if owner.input_request.is_some() { "1" } else { "0" }.to_string()),
        ));

        if let Some(block) = &owner.time_box {
            flatten_block(&mut row, block, &OWNER_TIME_BOX_SPEC);
        }

        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::parse_records_json_str;
    use crate::models::Table;

    fn meta(frequency: &str, plan_id: i64) -> FileMetadata {
        FileMetadata {
            frequency: Some(frequency.to_string()),
            plan_id: Some(plan_id),
        }
    }

    fn get<'a>(row: &'a FlatRow, column: &str) -> Option<&'a str> {
        row.iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, v)| v.as_deref())
    }

    fn parse_one(json: &str) -> SourceRecord {
        parse_records_json_str(json)
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_provider_site_renaming() {
        let record = parse_one(
            r#"[{"providerSiteCode": {"x": "PRV", "y": "SITE9", "region": "EU"}}]"#,
        );
        let rows = flatten_record(&record, &meta("daily", 1));

        assert_eq!(get(&rows[0], "provider"), Some("PRV"));
        assert_eq!(get(&rows[0], "site"), Some("SITE9"));
        assert_eq!(get(&rows[0], "providerSiteCode_region"), Some("EU"));
    }

    #[test]
    fn test_time_box_double_prefixing() {
        let record = parse_one(
            r#"[{
                "timeBox": {
                    "startTime": {"date": "2024-03-01", "time": 530},
                    "endTime": {"date": "2024-03-01", "time": 2330},
                    "timezone": "UTC"
                }
            }]"#,
        );
        let rows = flatten_record(&record, &meta("daily", 1));

        assert_eq!(get(&rows[0], "timeBox_startTime_date"), Some("2024-03-01"));
        assert_eq!(get(&rows[0], "timeBox_startTime_time"), Some("530"));
        assert_eq!(get(&rows[0], "timeBox_endTime_time"), Some("2330"));
        assert_eq!(get(&rows[0], "timeBox_timezone"), Some("UTC"));
    }

    #[test]
    fn test_owner_expansion_and_sequence() {
        let record = parse_one(
            r#"[{
                "providerSiteCode": {"x": "P", "y": "S"},
                "requestOwners": [
                    {"customerCollection": {"id": 1, "customer": "A"}},
                    {"customerCollection": {"id": 2, "customer": "B"}},
                    {"customerCollection": {"id": 3, "customer": "C"}}
                ]
            }]"#,
        );
        let rows = flatten_record(&record, &meta("adhoc", 438));

        assert_eq!(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(get(row, "ownerSequence"), Some((i + 1).to_string()).as_deref());
        }
        assert_eq!(get(&rows[2], "customerCollection_customer"), Some("C"));
    }

    #[test]
    fn test_zero_owner_record_yields_single_placeholder_row() {
        let record = parse_one(r#"[{"providerSiteCode": {"x": "P", "y": "S"}}]"#);
        let rows = flatten_record(&record, &meta("daily", 9));

        assert_eq!(rows.len(), 1);
        assert_eq!(get(&rows[0], "ownerSequence"), Some("1"));
        assert_eq!(get(&rows[0], "inputRequest_exists"), Some("0"));
        let columns: Vec<&str> = rows[0].iter().map(|(n, _)| n.as_str()).collect();
        for owner_column in OWNER_NULL_COLUMNS {
            assert!(columns.contains(owner_column), "missing {}", owner_column);
        }
        assert_eq!(get(&rows[0], "customerCollection_id"), None);
    }

    #[test]
    fn test_schema_uniform_across_owner_shapes() {
        let with_owner = parse_one(
            r#"[{
                "providerSiteCode": {"x": "P", "y": "S"},
                "requestOwners": [{
                    "customerCollection": {
                        "id": 1, "customer": "A", "name": "N", "frequency": "daily",
                        "earliestStartTime": 500, "expectedDeliveryTime": 900,
                        "hints": null, "status": "OK", "customerPackagingId": 4
                    },
                    "input": {"name": "in.json", "reference": "R-1"}
                }]
            }]"#,
        );
        let without_owner = parse_one(r#"[{"providerSiteCode": {"x": "P", "y": "S"}}]"#);

        let mut rows = flatten_record(&with_owner, &meta("daily", 1));
        rows.extend(flatten_record(&without_owner, &meta("daily", 2)));
        let table = Table::from_records(&rows);

        // Both shapes fill the same columns; the union adds nothing beyond
        // the owner timeBox columns neither record carries.
        for owner_column in OWNER_NULL_COLUMNS {
            assert!(table.has_column(owner_column));
        }
        assert_eq!(table.height(), 2);
        assert_eq!(table.cell(1, "customerCollection_customer"), None);
    }

    #[test]
    fn test_input_reference_falls_back_to_id() {
        let record = parse_one(
            r#"[{
                "requestOwners": [
                    {"input": {"name": "a.json", "reference": "R-9", "id": 7}},
                    {"input": {"name": "b.json", "id": 8}}
                ]
            }]"#,
        );
        let rows = flatten_record(&record, &FileMetadata::default());

        assert_eq!(get(&rows[0], "input_reference"), Some("R-9"));
        assert_eq!(get(&rows[1], "input_reference"), Some("8"));
    }

    #[test]
    fn test_request_presence_flags() {
        let with_request = parse_one(r#"[{"request": {"kind": "std"}}]"#);
        let without_request = parse_one(r#"[{}]"#);

        let rows = flatten_record(&with_request, &FileMetadata::default());
        assert_eq!(get(&rows[0], "requests_count"), Some("1"));
        assert_eq!(get(&rows[0], "enrichment_request_count"), Some("0"));

        let rows = flatten_record(&without_request, &FileMetadata::default());
        assert_eq!(get(&rows[0], "requests_count"), Some("0"));
    }

    #[test]
    fn test_missing_metadata_yields_null_columns() {
        let record = parse_one(r#"[{"providerSiteCode": {"x": "P", "y": "S"}}]"#);
        let rows = flatten_record(&record, &FileMetadata::default());

        assert_eq!(get(&rows[0], "collection_frequency"), None);
        assert_eq!(get(&rows[0], "hourly_collection_plan_id"), None);
        // Flattening still proceeds.
        assert_eq!(get(&rows[0], "provider"), Some("P"));
    }

    #[test]
    fn test_owner_time_box_uses_distinct_prefix() {
        let record = parse_one(
            r#"[{
                "timeBox": {"startTime": {"time": 500}},
                "requestOwners": [{
                    "timeBox": {"startTime": {"time": 700}}
                }]
            }]"#,
        );
        let rows = flatten_record(&record, &FileMetadata::default());

        assert_eq!(get(&rows[0], "timeBox_startTime_time"), Some("500"));
        assert_eq!(get(&rows[0], "timebox_startTime_time"), Some("700"));
    }
}
