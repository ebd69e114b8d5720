//! Per-feature DTO modules for the dashboard API.
//!
//! Each dashboard page owns a module with the response shapes it consumes;
//! [`crate::api`] re-exports them as the stable surface.

pub mod distribution;
pub mod heatmap;
pub mod landing;
pub mod summary;
