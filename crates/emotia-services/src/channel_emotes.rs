//! Enabling and disabling emotes on a channel.

use emotia_core::models::{
    Actor, AuditChange, AuditLog, AuditLogKind, AuditTarget, Channel, ChannelEmotesPayload,
    EmoteEvent, EmoteStatus,
};
use emotia_core::{AppError, AuditSink, Authorizer, EventSink};
use emotia_db::{ChannelStore, EmoteStore};
use std::sync::Arc;
use uuid::Uuid;

use crate::lifecycle::parse_id;
use crate::notify::{publish_event, record_audit};

const UNKNOWN_EMOTE: &str = "Unknown Emote";
const UNKNOWN_CHANNEL: &str = "Unknown Channel";

#[derive(Clone)]
pub struct ChannelEmoteService {
    emotes: Arc<dyn EmoteStore>,
    channels: Arc<dyn ChannelStore>,
    authorizer: Arc<dyn Authorizer>,
    audit: Arc<dyn AuditSink>,
    events: Arc<dyn EventSink>,
}

impl ChannelEmoteService {
    pub fn new(
        emotes: Arc<dyn EmoteStore>,
        channels: Arc<dyn ChannelStore>,
        authorizer: Arc<dyn Authorizer>,
        audit: Arc<dyn AuditSink>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            emotes,
            channels,
            authorizer,
            audit,
            events,
        }
    }

    /// Resolve ids, reject banned channels and check the actor may manage the channel.
    async fn load_managed(
        &self,
        actor: &Actor,
        channel_id: &str,
        emote_id: &str,
    ) -> Result<(Channel, Uuid), AppError> {
        let emote_id = parse_id(emote_id, UNKNOWN_EMOTE)?;
        let channel_id = parse_id(channel_id, UNKNOWN_CHANNEL)?;

        if self.channels.is_banned(channel_id).await? {
            return Err(AppError::Forbidden("Channel is banned".to_string()));
        }

        let channel = self
            .channels
            .find(channel_id)
            .await?
            .ok_or_else(|| AppError::NotFound(UNKNOWN_CHANNEL.to_string()))?;

        if !self.authorizer.may_manage(actor, channel.id).await? {
            return Err(AppError::Forbidden("Access Denied".to_string()));
        }

        Ok((channel, emote_id))
    }

    /// Enable `emote_id` on `channel_id` and return the updated channel.
    #[tracing::instrument(skip(self, actor, reason), fields(actor_id = %actor.id))]
    pub async fn add(
        &self,
        actor: &Actor,
        channel_id: &str,
        emote_id: &str,
        reason: Option<String>,
    ) -> Result<Channel, AppError> {
        let (channel, emote_id) = self.load_managed(actor, channel_id, emote_id).await?;
        if channel.has_emote(emote_id) {
            return Ok(channel);
        }

        let emote = self
            .emotes
            .find(emote_id)
            .await?
            .filter(|e| e.status == EmoteStatus::Live && e.is_enableable_by(channel.id))
            .ok_or_else(|| AppError::NotFound(UNKNOWN_EMOTE.to_string()))?;

        // The status check above can go stale under a concurrent delete or purge, so the
        // store re-checks liveness in the same statement that appends.
        let Some(updated) = self.channels.add_emote(channel.id, emote.id).await? else {
            return match self.channels.find(channel.id).await? {
                Some(current) if current.has_emote(emote.id) => Ok(current),
                Some(_) => Err(AppError::NotFound(UNKNOWN_EMOTE.to_string())),
                None => Err(AppError::NotFound(UNKNOWN_CHANNEL.to_string())),
            };
        };

        tracing::info!(channel_id = %updated.id, emote_id = %emote.id, "Emote enabled");

        self.notify(actor, &channel, &updated, emote.id, false, reason)
            .await;
        Ok(updated)
    }

    /// Disable `emote_id` on `channel_id` and return the updated channel.
    #[tracing::instrument(skip(self, actor, reason), fields(actor_id = %actor.id))]
    pub async fn remove(
        &self,
        actor: &Actor,
        channel_id: &str,
        emote_id: &str,
        reason: Option<String>,
    ) -> Result<Channel, AppError> {
        let (channel, emote_id) = self.load_managed(actor, channel_id, emote_id).await?;
        if !channel.has_emote(emote_id) {
            return Ok(channel);
        }

        let updated = self
            .channels
            .pull_emote(channel.id, emote_id)
            .await?
            .ok_or_else(|| AppError::NotFound(UNKNOWN_CHANNEL.to_string()))?;

        tracing::info!(channel_id = %updated.id, emote_id = %emote_id, "Emote disabled");

        self.notify(actor, &channel, &updated, emote_id, true, reason)
            .await;
        Ok(updated)
    }

    async fn notify(
        &self,
        actor: &Actor,
        before: &Channel,
        after: &Channel,
        emote_id: Uuid,
        removed: bool,
        reason: Option<String>,
    ) {
        let kind = if removed {
            AuditLogKind::ChannelEmoteRemove
        } else {
            AuditLogKind::ChannelEmoteAdd
        };

        record_audit(
            self.audit.as_ref(),
            AuditLog {
                kind,
                actor_id: actor.id,
                target: AuditTarget::channel(after.id),
                changes: vec![AuditChange::new("emotes", &before.emotes, &after.emotes)],
                reason: reason.filter(|r| !r.trim().is_empty()),
            },
        )
        .await;

        publish_event(
            self.events.as_ref(),
            EmoteEvent::ChannelEmotes {
                channel_id: after.id,
                payload: ChannelEmotesPayload {
                    removed,
                    id: emote_id,
                    actor: actor.display_name.clone(),
                },
            },
        )
        .await;
    }
}
