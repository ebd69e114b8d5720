//! Dataset storage via the repository pattern.
//!
//! Layered like the rest of the backend: handlers call the service layer
//! (`services`), which speaks to an abstract [`DatasetRepository`]
//! (`repository`), with concrete backends under `repositories`. The global
//! singleton exists for call sites that cannot thread a handle through.

#[cfg(not(any(feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod models;
pub mod repositories;
pub mod repository;
pub mod services;

use anyhow::Result;
use std::sync::{Arc, OnceLock};

use repository::DatasetRepository;

/// Global repository instance initialized once.
static REPOSITORY: OnceLock<Arc<dyn DatasetRepository>> = OnceLock::new();

/// Initialize the global repository singleton.
///
/// Idempotent: repeated calls after a successful init are no-ops.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    #[cfg(feature = "local-repo")]
    {
        let repo: Arc<dyn DatasetRepository> = Arc::new(repositories::LocalRepository::new());
        // A concurrent init winning the race is fine.
        let _ = REPOSITORY.set(repo);
    }

    Ok(())
}

/// Get the global repository instance.
///
/// Errors if [`init_repository`] has not been called.
pub fn get_repository() -> Result<Arc<dyn DatasetRepository>> {
    REPOSITORY
        .get()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Repository not initialized, call init_repository() first"))
}
