use serde::Serialize;
use uuid::Uuid;

use super::{Actor, Emote};

/// Payload published on `users:{channel_id}:emotes` whenever a channel's list changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelEmotesPayload {
    pub removed: bool,
    pub id: Uuid,
    pub actor: String,
}

/// Notifications emitted by the pipeline after a state change is committed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmoteEvent {
    Created {
        emote: Emote,
        actor: Actor,
    },
    Deleted {
        emote: Emote,
        actor: Actor,
        reason: String,
    },
    ChannelEmotes {
        channel_id: Uuid,
        payload: ChannelEmotesPayload,
    },
}

impl EmoteEvent {
    /// Pub/sub topic the event belongs to.
    pub fn topic(&self) -> String {
        match self {
            EmoteEvent::Created { .. } => "emotes:create".to_string(),
            EmoteEvent::Deleted { .. } => "emotes:delete".to_string(),
            EmoteEvent::ChannelEmotes { channel_id, .. } => format!("users:{}:emotes", channel_id),
        }
    }
}
