//! Storage setup and initialization

use anyhow::Result;
use resizer_core::Config;
use resizer_storage::{create_storage, Storage};
use std::sync::Arc;

/// Build one storage handle per bucket: `(upload, derivative)`.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, Arc<dyn Storage>)> {
    tracing::info!("Initializing storage abstraction...");

    let upload_storage = create_storage(config, config.upload_bucket()).await?;
    let derivative_storage = create_storage(config, config.derivative_bucket()).await?;

    tracing::info!(
        backend = %upload_storage.backend_type(),
        upload_bucket = %upload_storage.bucket(),
        derivative_bucket = %derivative_storage.bucket(),
        "Storage abstraction initialized successfully"
    );

    Ok((upload_storage, derivative_storage))
}
