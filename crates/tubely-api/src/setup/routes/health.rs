//! Health check handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: &'static str,
    pub storage: String,
    pub version: &'static str,
}

/// Liveness probe: the process is up and the storage backend is configured.
pub(super) async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: "healthy",
            storage: state.storage.backend_type().to_string(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
