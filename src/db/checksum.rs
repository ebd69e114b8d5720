//! Checksum calculation for dataset deduplication.

use sha2::{Digest, Sha256};

/// SHA-256 checksum of a counted table's CSV rendering, hex-encoded.
///
/// Ingesting the same source files twice yields byte-identical CSV and
/// therefore the same checksum, which the service layer uses to skip
/// duplicate storage.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
