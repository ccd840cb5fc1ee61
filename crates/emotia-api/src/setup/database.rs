//! Record store connection and schema

use anyhow::{Context, Result};
use emotia_core::Config;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Schema for `emotes`, `channels` and `audit_logs`, embedded at build time.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Open the pool and bring the schema up to date before any request is served.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .connect(config.database_url())
        .await
        .context("Failed to connect to the emote record store")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Record store connected"
    );

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to apply emote schema migrations")?;

    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default();
    tracing::info!(
        migrations = MIGRATOR.iter().count(),
        schema_version = latest,
        "Emote schema up to date"
    );

    Ok(pool)
}
