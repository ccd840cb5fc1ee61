//! Test helpers: build AppState and router over in-memory collaborators.
//!
//! Run from workspace root: `cargo test -p emotia-api`. No database or ImageMagick is
//! needed; the transcoder is replaced by a stub that echoes the planned size.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use emotia_api::auth::AuthState;
use emotia_api::state::{AppState, HealthChecks, UploadConfig};
use emotia_api::setup_routes;
use emotia_core::models::Channel;
use emotia_core::NoOpEventSink;
use emotia_db::{ChannelStore, InMemoryAuditSink, InMemoryChannelStore, InMemoryEmoteStore};
use emotia_processing::{PlannedRendition, TranscodeError, Transcoder, UploadValidator};
use emotia_services::{
    ChannelEmoteService, Collaborators, EmoteLifecycle, LifecycleSettings, PermissionAuthorizer,
};
use emotia_storage::MemoryStorage;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const BUCKET: &str = "emotes";
pub const MAX_UPLOAD_BYTES: usize = 256 * 1024;

/// Transcoder that produces `"{tier}:{w}x{h}"` instead of running ImageMagick.
pub struct StubTranscoder;

#[async_trait]
impl Transcoder for StubTranscoder {
    async fn transcode(
        &self,
        _input: &Path,
        rendition: &PlannedRendition,
    ) -> Result<Bytes, TranscodeError> {
        Ok(Bytes::from(format!(
            "{}:{}x{}",
            rendition.tier.id, rendition.width, rendition.height
        )))
    }
}

/// Test application: server plus handles on every in-memory collaborator.
pub struct TestApp {
    pub server: TestServer,
    pub emotes: InMemoryEmoteStore,
    pub channels: InMemoryChannelStore,
    pub storage: MemoryStorage,
    pub audit: InMemoryAuditSink,
    pub scratch: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub async fn add_channel(&self, channel: Channel) {
        self.channels.put(channel).await;
    }

    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub async fn setup_test_app() -> TestApp {
    let emotes = InMemoryEmoteStore::new();
    let channels = InMemoryChannelStore::with_emotes(emotes.clone());
    let storage = MemoryStorage::new();
    let audit = InMemoryAuditSink::new();
    let scratch = tempfile::tempdir().expect("create scratch dir");

    let channel_store: Arc<dyn ChannelStore> = Arc::new(channels.clone());
    let authorizer = Arc::new(PermissionAuthorizer::new(Arc::clone(&channel_store)));
    let events = Arc::new(NoOpEventSink);

    let deps = Collaborators {
        emotes: Arc::new(emotes.clone()),
        channels: Arc::clone(&channel_store),
        storage: Arc::new(storage.clone()),
        transcoder: Arc::new(StubTranscoder),
        authorizer: authorizer.clone(),
        audit: Arc::new(audit.clone()),
        events: events.clone(),
    };

    let state = Arc::new(AppState {
        lifecycle: Arc::new(EmoteLifecycle::new(
            deps,
            LifecycleSettings {
                bucket: BUCKET.to_string(),
                max_frames: 1024,
                purge_retry_attempts: 1,
            },
        )),
        channel_emotes: ChannelEmoteService::new(
            Arc::new(emotes.clone()),
            channel_store,
            authorizer,
            Arc::new(audit.clone()),
            events,
        ),
        upload: UploadConfig {
            validator: UploadValidator::new(MAX_UPLOAD_BYTES),
            scratch_root: scratch.path().to_path_buf(),
        },
        auth: Arc::new(AuthState::new(auth::TEST_JWT_SECRET)),
        health: HealthChecks {
            emotes: Arc::new(emotes.clone()),
            storage: Arc::new(storage.clone()),
            bucket: BUCKET.to_string(),
        },
    });

    let server = TestServer::new(setup_routes(state)).expect("start test server");

    TestApp {
        server,
        emotes,
        channels,
        storage,
        audit,
        scratch,
    }
}
