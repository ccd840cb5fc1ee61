//! Storage setup and initialization

use anyhow::{Context, Result};
use emotia_core::Config;
use emotia_storage::{create_storage, Storage};
use std::sync::Arc;

/// Create the configured storage backend for rendition objects.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(
        backend = ?storage.backend_type(),
        bucket = %config.cdn_bucket(),
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}
