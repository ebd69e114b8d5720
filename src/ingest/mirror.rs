//! Source-file mirroring.
//!
//! Raw scheduling files live in a remote object store; the pipeline works
//! from a local cache directory kept in sync with it. [`ObjectMirror`]
//! abstracts the remote side so the sync logic (and everything downstream)
//! stays storage-agnostic, with [`DirectoryStore`] serving local development
//! and tests.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read-only listing/fetch view of a remote object store.
pub trait ObjectMirror: Send + Sync {
    /// Names of all objects currently in the store.
    fn list_objects(&self) -> Result<Vec<String>>;

    /// Raw bytes of one object.
    fn fetch_object(&self, name: &str) -> Result<Vec<u8>>;
}

/// [`ObjectMirror`] over a plain directory.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ObjectMirror for DirectoryStore {
    fn list_objects(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list source store {}", self.root.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn fetch_object(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        fs::read(&path).with_context(|| format!("Failed to read object {}", path.display()))
    }
}

/// Outcome of one mirror sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Bring `cache_dir` up to date with the store.
///
/// Files already present locally are skipped by name; the store is treated
/// as append-only, so no local file is ever deleted or overwritten. A
/// failing object is logged and skipped rather than aborting the batch;
/// only an unlistable store is fatal.
pub fn sync_mirror(store: &dyn ObjectMirror, cache_dir: &Path) -> Result<SyncReport> {
    fs::create_dir_all(cache_dir)
        .with_context(|| format!("Failed to create cache dir {}", cache_dir.display()))?;

    let mut report = SyncReport::default();
    for name in store.list_objects()? {
        let target = cache_dir.join(&name);
        if target.exists() {
            report.skipped += 1;
            continue;
        }
        let outcome = store
            .fetch_object(&name)
            .and_then(|bytes| {
                fs::write(&target, bytes)
                    .with_context(|| format!("Failed to write {}", target.display()))
            });
        match outcome {
            Ok(()) => {
                tracing::info!(object = %name, "downloaded source file");
                report.downloaded += 1;
            }
            Err(e) => {
                tracing::warn!(object = %name, error = %e, "skipping undownloadable object");
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

/// Decompress `bytes` when `name` carries a `.gz` suffix; pass through
/// otherwise. Corrupt gzip data is an error, never silently passed on.
pub fn maybe_decompress(name: &str, bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !name.ends_with(".gz") {
        return Ok(bytes);
    }
    let mut decoder = GzDecoder::new(bytes.as_slice());
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .with_context(|| format!("Failed to decompress {}", name))?;
    Ok(out)
}

/// Decompress every `.gz` file under `dir` to a sibling path with the
/// suffix stripped. Already-decompressed siblings are left alone; per-file
/// failures are logged and skipped.
pub fn decompress_directory(dir: &Path) -> Result<usize> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut written = 0;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let stem = match name.strip_suffix(".gz") {
            Some(stem) if entry.file_type()?.is_file() => stem.to_string(),
            _ => continue,
        };
        let target = dir.join(&stem);
        if target.exists() {
            continue;
        }
        let outcome = fs::read(entry.path())
            .with_context(|| format!("Failed to read {}", name))
            .and_then(|bytes| maybe_decompress(&name, bytes))
            .and_then(|bytes| {
                fs::write(&target, bytes)
                    .with_context(|| format!("Failed to write {}", target.display()))
            });
        match outcome {
            Ok(()) => written += 1,
            Err(e) => tracing::warn!(file = %name, error = %e, "skipping undecompressable file"),
        }
    }
    Ok(written)
}
