//! Domain models shared by every layer.

pub mod actor;
pub mod audit;
pub mod channel;
pub mod emote;
pub mod event;

pub use actor::{Actor, Permission};
pub use audit::{AuditChange, AuditLog, AuditLogKind, AuditTarget};
pub use channel::Channel;
pub use emote::{Emote, EmoteStatus, NewEmote, Visibility, RENDITION_MIME, TIER_COUNT};
pub use event::{ChannelEmotesPayload, EmoteEvent};
