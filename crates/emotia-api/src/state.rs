//! Application state shared by every handler.

use emotia_db::EmoteStore;
use emotia_processing::UploadValidator;
use emotia_services::{ChannelEmoteService, EmoteLifecycle, Storage};
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::AuthState;

/// Upload limits and scratch location for the ingest endpoint.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub validator: UploadValidator,
    /// Root under which each ingest run gets its own workspace directory.
    pub scratch_root: PathBuf,
}

/// Collaborators checked by the health endpoint.
#[derive(Clone)]
pub struct HealthChecks {
    pub emotes: Arc<dyn EmoteStore>,
    pub storage: Arc<dyn Storage>,
    pub bucket: String,
}

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<EmoteLifecycle>,
    pub channel_emotes: ChannelEmoteService,
    pub upload: UploadConfig,
    pub auth: Arc<AuthState>,
    pub health: HealthChecks,
}
