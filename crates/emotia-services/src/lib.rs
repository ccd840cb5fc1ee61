//! Emotia Services Layer
//!
//! This crate is the **pipeline layer**: it orchestrates ingest, deletion and
//! channel emote mutations on top of the processing stages, record stores and
//! object storage, and hosts the collaborator implementations (permission
//! authorizer, Discord notifications). Keep coordination here; keep thin HTTP
//! handling in emotia-api.

pub mod authorizer;
pub mod channel_emotes;
pub mod discord;
pub mod lifecycle;
mod notify;
pub mod purge;
pub mod upload;

#[cfg(test)]
mod testing;

pub use authorizer::PermissionAuthorizer;
pub use channel_emotes::ChannelEmoteService;
pub use discord::DiscordWebhookSink;
pub use lifecycle::{
    Collaborators, DeletedEmote, EmoteLifecycle, IngestRequest, LifecycleSettings,
};
pub use purge::{PurgeOrchestrator, PurgeReport};
pub use upload::{EncodedRendition, TierFailure, UploadCoordinator, UploadError};

pub use emotia_processing::{
    MagickTranscoder, ScratchWorkspace, SourceFormat, Transcoder, UploadValidator,
};
pub use emotia_storage::{create_storage, Storage, StorageBackend, StorageError, StorageResult};
