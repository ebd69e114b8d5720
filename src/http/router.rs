//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing) and
//! creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Dataset CRUD
        .route("/datasets", get(handlers::list_datasets))
        .route("/datasets", post(handlers::ingest_dataset))
        .route("/datasets/{dataset_id}", delete(handlers::delete_dataset))
        // Job management
        .route("/jobs/{job_id}", get(handlers::get_job_status))
        .route("/jobs/{job_id}/logs", get(handlers::stream_job_logs))
        // Dashboard endpoints
        .route("/datasets/{dataset_id}/summary", get(handlers::get_summary))
        .route(
            "/datasets/{dataset_id}/distributions",
            get(handlers::get_distributions),
        )
        .route("/datasets/{dataset_id}/heatmap", get(handlers::get_heatmap))
        .route("/datasets/{dataset_id}/rows", get(handlers::get_rows))
        .route(
            "/datasets/{dataset_id}/filter-options",
            get(handlers::get_filter_options),
        )
        .route(
            "/datasets/{dataset_id}/export",
            get(handlers::export_dataset),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
