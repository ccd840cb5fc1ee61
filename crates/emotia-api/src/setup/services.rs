//! Service initialization and application state setup

use crate::auth::AuthState;
use crate::state::{AppState, HealthChecks, UploadConfig};
use anyhow::{Context, Result};
use emotia_core::{AuditSink, Config, EventSink, NoOpEventSink};
use emotia_db::{AuditLogRepository, ChannelRepository, ChannelStore, EmoteRepository, EmoteStore};
use emotia_processing::{MagickTranscoder, UploadValidator};
use emotia_services::{
    ChannelEmoteService, Collaborators, DiscordWebhookSink, EmoteLifecycle, LifecycleSettings,
    PermissionAuthorizer, Storage,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

fn event_sink(config: &Config) -> Result<Arc<dyn EventSink>> {
    match config.discord_webhook_url() {
        Some(url) => {
            let sink = DiscordWebhookSink::new(url).context("Failed to create Discord sink")?;
            tracing::info!("Discord notifications enabled");
            Ok(Arc::new(sink))
        }
        None => {
            tracing::info!("DISCORD_WEBHOOK_URL not set, events will not be forwarded");
            Ok(Arc::new(NoOpEventSink))
        }
    }
}

/// Wire repositories, pipeline services and collaborators into the application state
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let emotes: Arc<dyn EmoteStore> = Arc::new(EmoteRepository::new(pool.clone()));
    let channels: Arc<dyn ChannelStore> = Arc::new(ChannelRepository::new(pool.clone()));
    let audit: Arc<dyn AuditSink> = Arc::new(AuditLogRepository::new(pool));
    let events = event_sink(config)?;
    let authorizer = Arc::new(PermissionAuthorizer::new(Arc::clone(&channels)));

    let transcoder = Arc::new(MagickTranscoder::new(
        config.magick_path(),
        Duration::from_secs(config.transcode_timeout_secs()),
    ));

    let deps = Collaborators {
        emotes: Arc::clone(&emotes),
        channels: Arc::clone(&channels),
        storage: Arc::clone(&storage),
        transcoder,
        authorizer: authorizer.clone(),
        audit: Arc::clone(&audit),
        events: Arc::clone(&events),
    };

    let channel_emotes = ChannelEmoteService::new(
        Arc::clone(&emotes),
        channels,
        authorizer,
        audit,
        events,
    );

    tracing::info!(
        magick_path = %config.magick_path(),
        max_frames = config.max_frame_count(),
        scratch_root = %config.temp_file_store().display(),
        "Pipeline services initialized"
    );

    Ok(Arc::new(AppState {
        lifecycle: Arc::new(EmoteLifecycle::new(
            deps,
            LifecycleSettings::from_config(config),
        )),
        channel_emotes,
        upload: UploadConfig {
            validator: UploadValidator::new(config.max_upload_size_bytes()),
            scratch_root: config.temp_file_store().clone(),
        },
        auth: Arc::new(AuthState::new(config.jwt_secret())),
        health: HealthChecks {
            emotes,
            storage,
            bucket: config.cdn_bucket().to_string(),
        },
    }))
}
