//! Application setup and initialization
//!
//! Keeps main.rs down to loading configuration and starting the server.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use resizer_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let scratch_dir = config.scratch_dir();
    tokio::fs::create_dir_all(&scratch_dir)
        .await
        .with_context(|| format!("Failed to create scratch directory {}", scratch_dir.display()))?;

    let (upload_storage, derivative_storage) = storage::setup_storage(&config)
        .await
        .context("Storage initialization failed")?;

    let state = Arc::new(AppState::new(
        config.clone(),
        upload_storage,
        derivative_storage,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
