//! HTTP server module for the dashboard backend.
//!
//! An axum-based REST API over the service layer: dataset CRUD plus the
//! per-page analytics endpoints the dashboard renders. Handlers never touch
//! storage directly; they go through the repository behind [`AppState`].

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
