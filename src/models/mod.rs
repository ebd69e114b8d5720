//! Domain models: source records, packed times and the text table.

pub mod packed_time;
pub mod record;
pub mod table;

pub use packed_time::TimeCategory;
pub use record::{OwnerEntry, SourceRecord};
pub use table::{canonical_text, FlatRow, Table};
