//! Filename metadata convention.
//!
//! Source files are named `<frequency>-<planId>.<ext>` (e.g. `adhoc-438.json`,
//! `daily-429.json.gz`). The filename is the sole carrier of collection
//! frequency and plan id for JSON-sourced rows; a mismatch is non-fatal and
//! simply leaves both columns null.

/// Frequency tag and plan id extracted from a source filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    pub frequency: Option<String>,
    pub plan_id: Option<i64>,
}

impl FileMetadata {
    pub fn is_complete(&self) -> bool {
        self.frequency.is_some() && self.plan_id.is_some()
    }
}

/// Recognized source-file extensions, longest suffix first.
const KNOWN_EXTENSIONS: [&str; 3] = [".json.gz", ".json", ".parquet"];

/// Extract `<frequency>-<planId>` metadata from a bare filename.
///
/// The tag must be purely alphabetic and the id purely numeric; anything else
/// yields empty metadata. The caller decides whether to warn.
pub fn extract_file_metadata(filename: &str) -> FileMetadata {
    let stem = match KNOWN_EXTENSIONS
        .iter()
        .find_map(|ext| filename.strip_suffix(ext))
    {
        Some(stem) => stem,
        None => return FileMetadata::default(),
    };

    let (tag, id) = match stem.split_once('-') {
        Some(parts) => parts,
        None => return FileMetadata::default(),
    };

    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphabetic()) {
        return FileMetadata::default();
    }
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return FileMetadata::default();
    }

    FileMetadata {
        frequency: Some(tag.to_string()),
        plan_id: id.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_valid_json_filename() {
        let meta = extract_file_metadata("adhoc-438.json");
        assert_eq!(meta.frequency.as_deref(), Some("adhoc"));
        assert_eq!(meta.plan_id, Some(438));
    }

    #[test]
    fn test_extract_gzip_and_parquet_filenames() {
        let meta = extract_file_metadata("daily-429.json.gz");
        assert_eq!(meta.frequency.as_deref(), Some("daily"));
        assert_eq!(meta.plan_id, Some(429));

        let meta = extract_file_metadata("weekly-7.parquet");
        assert_eq!(meta.frequency.as_deref(), Some("weekly"));
        assert_eq!(meta.plan_id, Some(7));
    }

    #[test]
    fn test_extract_rejects_malformed_names() {
        assert!(!extract_file_metadata("nodash.json").is_complete());
        assert!(!extract_file_metadata("123-456.json").is_complete());
        assert!(!extract_file_metadata("adhoc-xyz.json").is_complete());
        assert!(!extract_file_metadata("adhoc-438.csv").is_complete());
        assert!(!extract_file_metadata("-438.json").is_complete());
        assert!(!extract_file_metadata("adhoc-.json").is_complete());
    }

    #[test]
    fn test_malformed_name_yields_all_null_metadata() {
        let meta = extract_file_metadata("notes.txt");
        assert_eq!(meta, FileMetadata::default());
    }
}
