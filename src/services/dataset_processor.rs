//! Async dataset ingestion service.
//!
//! Runs the full batch pipeline (flatten, combine, group, store) in the
//! background, emitting progress logs through the job tracker so the
//! dashboard can stream them via SSE.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::DatasetId;
use crate::db::repository::DatasetRepository;
use crate::db::services::{store_dataset_deduplicated, StoreOutcome};
use crate::grouping::{group_table, GroupReport, ROW_COUNT_COLUMN};
use crate::ingest::combine_directory;
use crate::services::job_tracker::{JobTracker, LogLevel};

/// Process a source directory asynchronously: combine, group and store.
///
/// Designed to be spawned as a background task; progress goes to the job
/// tracker, success and failure additionally settle the job's status.
pub async fn process_ingest_async(
    job_id: String,
    tracker: JobTracker,
    repo: Arc<dyn DatasetRepository>,
    dataset_name: String,
    source_dir: PathBuf,
    batch_size: usize,
) -> Result<DatasetId, String> {
    tracker.log(&job_id, LogLevel::Info, "Starting dataset ingestion...");

    tracker.log(
        &job_id,
        LogLevel::Info,
        format!("Flattening source files in {}...", source_dir.display()),
    );
    let combined = tokio::task::spawn_blocking({
        let source_dir = source_dir.clone();
        move || combine_directory(&source_dir)
    })
    .await;
    let (table, stats) = match combined {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            let msg = format!("Failed to flatten source files: {}", e);
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
        Err(e) => {
            let msg = format!("Flatten task panic: {}", e);
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
    };
    tracker.log(
        &job_id,
        LogLevel::Success,
        format!(
            "✓ Flattened {} files into {} rows",
            stats.len(),
            table.height()
        ),
    );

    if table.is_empty() {
        let msg = "No rows produced, refusing to store an empty dataset".to_string();
        tracker.fail_job(&job_id, &msg);
        return Err(msg);
    }

    tracker.log(&job_id, LogLevel::Info, "Grouping duplicate rows...");
    let counted = match tokio::task::spawn_blocking({
        let table = table.clone();
        move || group_table(&table, batch_size)
    })
    .await
    {
        Ok(Ok(counted)) => counted,
        Ok(Err(e)) => {
            let msg = format!("Failed to group rows: {}", e);
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
        Err(e) => {
            let msg = format!("Grouping task panic: {}", e);
            tracker.fail_job(&job_id, &msg);
            return Err(msg);
        }
    };
    let report = GroupReport {
        input_rows: table.height() as u64,
        distinct_rows: counted.height(),
    };
    tracker.log(
        &job_id,
        LogLevel::Success,
        format!(
            "✓ {} rows collapsed into {} distinct rows with {}",
            report.input_rows, report.distinct_rows, ROW_COUNT_COLUMN
        ),
    );

    tracker.log(&job_id, LogLevel::Info, "Storing dataset in repository...");
    let outcome =
        match store_dataset_deduplicated(repo.as_ref(), dataset_name, counted, stats, report)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                let msg = format!("Failed to store dataset: {}", e);
                tracker.fail_job(&job_id, &msg);
                return Err(msg);
            }
        };

    let dataset_id = outcome.dataset_id();
    match outcome {
        StoreOutcome::Created(_) => tracker.log(
            &job_id,
            LogLevel::Success,
            format!("✓ Stored dataset (ID: {})", dataset_id),
        ),
        StoreOutcome::Duplicate(_) => tracker.log(
            &job_id,
            LogLevel::Warning,
            format!("Identical dataset already stored (ID: {})", dataset_id),
        ),
    }

    tracker.log(&job_id, LogLevel::Success, "✅ Ingestion complete");
    tracker.complete_job(&job_id, dataset_id);
    Ok(dataset_id)
}
