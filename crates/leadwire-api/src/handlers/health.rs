//! Health check handler for service monitoring.
//!
//! The relay holds no durable state and no connection pool worth probing, so
//! health is a liveness signal only.

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Timestamp when the health check was performed.
    pub timestamp: DateTime<Utc>,
    /// Service version information.
    pub version: String,
}

/// Health check endpoint handler.
///
/// Designed to be called frequently by orchestration systems and load
/// balancers; performs no expensive work.
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}
