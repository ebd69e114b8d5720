//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::sse::{Event, Sse},
    response::IntoResponse,
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::path::PathBuf;
use std::time::Duration;

use super::dto::{
    AnalyticsQuery, DatasetListResponse, FilterOptionsResponse, HealthResponse, IngestRequest,
    IngestResponse, JobStatusResponse, RowsQuery, RowsResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{DatasetId, DistributionData, HeatmapData, SummaryData};
use crate::enrich::{enrich_table, TIME_CATEGORY_COLUMN};
use crate::io::write_table_csv_bytes;
use crate::models::Table;
use crate::services::dataset_processor::process_ingest_async;
use crate::services::filters::{apply_filters, filter_options, FilterSpec};
use crate::services::{distributions, heatmap, summary};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Fetch a dataset, enrich it and apply the dashboard filters.
async fn load_filtered(
    state: &AppState,
    dataset_id: i64,
    filters: &FilterSpec,
) -> Result<Table, AppError> {
    let stored = state
        .repository
        .fetch_dataset(DatasetId(dataset_id))
        .await?;
    let enriched = enrich_table(&stored.table);
    Ok(apply_filters(&enriched, filters))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository: repo_status,
    }))
}

// =============================================================================
// Dataset CRUD
// =============================================================================

/// GET /v1/datasets
pub async fn list_datasets(State(state): State<AppState>) -> HandlerResult<DatasetListResponse> {
    let datasets = state.repository.list_datasets().await?;
    let total = datasets.len();
    Ok(Json(DatasetListResponse { datasets, total }))
}

/// POST /v1/datasets
///
/// Ingest a source directory asynchronously. Returns a job ID for tracking
/// progress via the jobs endpoints.
pub async fn ingest_dataset(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("Dataset name must not be empty".to_string()));
    }

    let source_dir = request
        .source_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config.ingest.cache_dir.clone());

    let job_id = state.job_tracker.create_job(request.name.clone());
    let response_job_id = job_id.clone();

    tokio::spawn(process_ingest_async(
        job_id,
        state.job_tracker.clone(),
        state.repository.clone(),
        request.name,
        source_dir,
        state.config.ingest.batch_size,
    ));

    Ok((
        StatusCode::ACCEPTED,
        Json(IngestResponse {
            job_id: response_job_id,
            message: "Ingestion started, poll the job for progress".to_string(),
        }),
    ))
}

/// DELETE /v1/datasets/{dataset_id}
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .repository
        .delete_dataset(DatasetId(dataset_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Jobs
// =============================================================================

/// GET /v1/jobs/{job_id}
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobStatusResponse {
        job_id: job.job_id,
        dataset_name: job.dataset_name,
        status: format!("{:?}", job.status).to_lowercase(),
        logs: job.logs,
        dataset_id: job.dataset_id,
    }))
}

/// GET /v1/jobs/{job_id}/logs
///
/// Stream job logs via Server-Sent Events (SSE).
pub async fn stream_job_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if state.job_tracker.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)));
    }

    let tracker = state.job_tracker.clone();
    let stream = async_stream::stream! {
        let mut last_log_count = 0;
        loop {
            let logs = tracker.get_logs(&job_id);
            for log in logs.iter().skip(last_log_count) {
                let event_data = serde_json::to_string(log).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }
            last_log_count = logs.len();

            if let Some(job) = tracker.get_job(&job_id) {
                if job.status != crate::services::job_tracker::JobStatus::Running {
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "dataset_id": job.dataset_id,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
            } else {
                break;
            }

            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}

// =============================================================================
// Analytics
// =============================================================================

/// GET /v1/datasets/{dataset_id}/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
    Query(query): Query<AnalyticsQuery>,
) -> HandlerResult<SummaryData> {
    let table = load_filtered(&state, dataset_id, &query.filters).await?;
    Ok(Json(summary::compute_summary(&table)))
}

/// GET /v1/datasets/{dataset_id}/distributions
pub async fn get_distributions(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
    Query(query): Query<AnalyticsQuery>,
) -> HandlerResult<DistributionData> {
    let table = load_filtered(&state, dataset_id, &query.filters).await?;
    Ok(Json(distributions::compute_distribution(&table)))
}

/// GET /v1/datasets/{dataset_id}/heatmap
pub async fn get_heatmap(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
    Query(query): Query<AnalyticsQuery>,
) -> HandlerResult<HeatmapData> {
    let table = load_filtered(&state, dataset_id, &query.filters).await?;
    Ok(Json(heatmap::compute_heatmap(&table)))
}

/// GET /v1/datasets/{dataset_id}/rows
///
/// One page of enriched, filtered rows for the explorer table.
pub async fn get_rows(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
    Query(query): Query<RowsQuery>,
) -> HandlerResult<RowsResponse> {
    let table = load_filtered(&state, dataset_id, &query.filters).await?;

    let total = table.height();
    let end = query.offset.saturating_add(query.limit).min(total);
    let indices: Vec<usize> = (query.offset.min(total)..end).collect();
    let page = table.select_rows(&indices);

    Ok(Json(RowsResponse {
        columns: page.columns().to_vec(),
        rows: page.rows().to_vec(),
        total,
        offset: query.offset,
    }))
}

/// GET /v1/datasets/{dataset_id}/filter-options
pub async fn get_filter_options(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
) -> HandlerResult<FilterOptionsResponse> {
    let table = load_filtered(&state, dataset_id, &FilterSpec::default()).await?;

    Ok(Json(FilterOptionsResponse {
        providers: filter_options(&table, "provider"),
        sites: filter_options(&table, "site"),
        frequencies: filter_options(&table, "collection_frequency"),
        customers: filter_options(&table, "customerCollection_customer"),
        time_categories: filter_options(&table, TIME_CATEGORY_COLUMN),
    }))
}

/// GET /v1/datasets/{dataset_id}/export
///
/// Download the raw counted table as CSV. Derived columns are not included;
/// they exist only in the analytics views.
pub async fn export_dataset(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let stored = state
        .repository
        .fetch_dataset(DatasetId(dataset_id))
        .await?;
    let bytes = write_table_csv_bytes(&stored.table)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"dataset-{}.csv\"", dataset_id),
            ),
        ],
        bytes,
    ))
}
