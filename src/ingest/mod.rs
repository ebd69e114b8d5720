//! Ingest pipeline: mirror sync, filename metadata, record flattening and
//! batch combination.

pub mod combine;
pub mod flatten;
pub mod metadata;
pub mod mirror;

pub use combine::{combine_directory, flatten_file, FileStats};
pub use flatten::flatten_record;
pub use metadata::{extract_file_metadata, FileMetadata};
pub use mirror::{
    decompress_directory, maybe_decompress, sync_mirror, DirectoryStore, ObjectMirror, SyncReport,
};
