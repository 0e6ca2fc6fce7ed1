//! Application setup and initialization

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use tubely_core::Config;
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_storage::create_storage;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    let repository: Arc<dyn VideoRepository> = Arc::new(InMemoryVideoRepository::new());

    let state = Arc::new(AppState::new(config.clone(), storage, repository)?);
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
