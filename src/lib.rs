//! # ADX Rust Backend
//!
//! Batch data preparation and dashboard backend for the Autoscheduler Data
//! Explorer (ADX).
//!
//! This crate turns raw flight-data-collection scheduling files into a
//! compact, analyzable dataset and serves it to the dashboard: nested JSON
//! records are flattened into schema-uniform rows, exact-duplicate rows are
//! collapsed into a counted table, and derived time fields are computed on
//! read for the analytics endpoints. The backend exposes a REST API via
//! Axum for the dashboard frontend.
//!
//! ## Features
//!
//! - **Ingest**: Mirror sync, gzip decompression, filename metadata and
//!   record flattening
//! - **Grouping**: Streaming exact-duplicate tally producing the counted
//!   table with `row_count`
//! - **Enrichment**: Packed `HHMM` time helpers and derived columns
//! - **Analytics**: Summary, distribution and heatmap aggregates with
//!   dashboard filters
//! - **HTTP API**: RESTful endpoints plus SSE job-log streaming
//!
//! ## Architecture
//!
//! - [`models`]: Source records, packed times and the text table
//! - [`ingest`]: Mirror sync and flattening pipeline
//! - [`grouping`]: Duplicate-row tallying
//! - [`enrich`]: Derived-field computation
//! - [`io`]: CSV/parquet interchange via Polars
//! - [`db`]: Repository pattern and dataset persistence
//! - [`services`]: Analytics compute and background ingestion
//! - [`routes`]: Per-page DTOs, re-exported through [`api`]
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod enrich;
pub mod grouping;
pub mod ingest;
pub mod io;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
