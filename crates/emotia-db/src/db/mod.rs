//! Database repositories
//!
//! Two logical collections back the pipeline: `emotes` (the asset records) and
//! `channels` (consumer records holding a list of enabled emote ids). Both are keyed
//! by `Uuid`. Audit entries go to `audit_logs`.

pub mod audit;
pub mod channel;
pub mod emote;

pub use audit::AuditLogRepository;
pub use channel::{ChannelRepository, ChannelStore};
pub use emote::{EmoteRepository, EmoteStore};
