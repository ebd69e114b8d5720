// ============================================================================
// JSON Parsing Functions
// ============================================================================
//
// Source files hold an array of nested scheduling records. Records and their
// owner entries exist only transiently: they are parsed, flattened into rows,
// and discarded.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// One nested scheduling record as downloaded from the mirror.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SourceRecord {
    /// Provider/site code pair plus any extra positional sub-fields.
    #[serde(rename = "providerSiteCode")]
    pub provider_site_code: Option<Map<String, Value>>,
    /// Customer id, customer-site code and priority.
    #[serde(rename = "siteHierarchy")]
    pub site_hierarchy: Option<Map<String, Value>>,
    /// Presence is tracked as a flag; the block's content is never flattened.
    pub request: Option<Map<String, Value>>,
    /// Top-level collection window.
    #[serde(rename = "timeBox")]
    pub time_box: Option<Map<String, Value>>,
    #[serde(rename = "requestOwners", default)]
    pub request_owners: Vec<OwnerEntry>,
}

/// One requesting customer's collection attached to a parent record.
///
/// An owner has no identity outside its parent; its position in the parent's
/// list becomes the 1-based `ownerSequence` column.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OwnerEntry {
    #[serde(rename = "customerCollection")]
    pub customer_collection: Option<Map<String, Value>>,
    pub input: Option<Map<String, Value>>,
    #[serde(rename = "inputRequest")]
    pub input_request: Option<Value>,
    #[serde(rename = "timeBox")]
    pub time_box: Option<Map<String, Value>>,
}

fn validate_input_records(records_json: &str) -> Result<()> {
    let value: Value = serde_json::from_str(records_json).context("Invalid records JSON")?;
    if !value.is_array() {
        anyhow::bail!("Expected a top-level JSON array of scheduling records");
    }
    Ok(())
}

/// Parse a source file's JSON text into scheduling records.
///
/// The file must hold a top-level array; each element deserializes into a
/// [`SourceRecord`] with unknown keys ignored.
pub fn parse_records_json_str(records_json: &str) -> Result<Vec<SourceRecord>> {
    validate_input_records(records_json)?;

    let records: Vec<SourceRecord> = serde_json::from_str(records_json)
        .context("Failed to deserialize scheduling records using Serde")?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_record() {
        let json = r#"[
            {
                "providerSiteCode": {"x": "P1", "y": "S1"},
                "timeBox": {
                    "startTime": {"date": "2024-01-01", "time": 500},
                    "endTime": {"date": "2024-01-01", "time": 1700}
                }
            }
        ]"#;

        let records = parse_records_json_str(json).expect("Should parse minimal record");
        assert_eq!(records.len(), 1);
        assert!(records[0].provider_site_code.is_some());
        assert!(records[0].request_owners.is_empty());
    }

    #[test]
    fn test_parse_record_with_owners() {
        let json = r#"[
            {
                "providerSiteCode": {"x": "P1", "y": "S1"},
                "requestOwners": [
                    {
                        "customerCollection": {"id": 7, "customer": "ACME"},
                        "input": {"name": "req-7.json", "reference": "R-7"}
                    },
                    {
                        "customerCollection": {"id": 8, "customer": "ZENO"}
                    }
                ]
            }
        ]"#;

        let records = parse_records_json_str(json).unwrap();
        assert_eq!(records[0].request_owners.len(), 2);
        assert!(records[0].request_owners[0].input.is_some());
        assert!(records[0].request_owners[1].input.is_none());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let result = parse_records_json_str(r#"{"records": []}"#);
        assert!(result.is_err(), "Should fail without a top-level array");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let result = parse_records_json_str("not valid json {");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_empty_array() {
        let records = parse_records_json_str("[]").unwrap();
        assert!(records.is_empty());
    }
}
