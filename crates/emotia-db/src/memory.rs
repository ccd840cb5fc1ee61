//! In-memory record stores for tests
//!
//! Semantics match the PostgreSQL repositories: conditional status updates,
//! atomic pulls, and store-assigned identities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use emotia_core::models::{AuditLog, Channel, Emote, EmoteStatus, NewEmote};
use emotia_core::{AppError, AuditSink};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::emote::ensure_transition;
use crate::db::{ChannelStore, EmoteStore};

#[derive(Clone, Default)]
pub struct InMemoryEmoteStore {
    emotes: Arc<RwLock<HashMap<Uuid, Emote>>>,
}

impl InMemoryEmoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record as-is.
    pub async fn put(&self, emote: Emote) {
        self.emotes.write().await.insert(emote.id, emote);
    }

    pub async fn get(&self, id: Uuid) -> Option<Emote> {
        self.emotes.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.emotes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.emotes.read().await.is_empty()
    }
}

#[async_trait]
impl EmoteStore for InMemoryEmoteStore {
    async fn insert(&self, emote: &NewEmote) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        self.emotes
            .write()
            .await
            .insert(id, emote.clone().into_emote(id));
        Ok(id)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Emote>, AppError> {
        Ok(self.get(id).await)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: EmoteStatus,
        to: EmoteStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        ensure_transition(from, to)?;

        let mut emotes = self.emotes.write().await;
        match emotes.get_mut(&id) {
            Some(emote) if emote.status == from => {
                emote.status = to;
                emote.last_modified = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_deleted(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut emotes = self.emotes.write().await;
        match emotes.get_mut(&id) {
            Some(emote) if emote.status.can_transition_to(EmoteStatus::Deleted) => {
                emote.status = EmoteStatus::Deleted;
                emote.last_modified = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.emotes.write().await.remove(&id).is_some())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryChannelStore {
    channels: Arc<RwLock<HashMap<Uuid, Channel>>>,
    banned: Arc<RwLock<HashSet<Uuid>>>,
    emotes: Option<InMemoryEmoteStore>,
}

impl InMemoryChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel store that checks emote status against `emotes` when enabling, the way the
    /// record store joins `channels` against `emotes`.
    pub fn with_emotes(emotes: InMemoryEmoteStore) -> Self {
        Self {
            emotes: Some(emotes),
            ..Self::default()
        }
    }

    pub async fn put(&self, channel: Channel) {
        self.channels.write().await.insert(channel.id, channel);
    }

    pub async fn ban(&self, id: Uuid) {
        self.banned.write().await.insert(id);
    }

    pub async fn get(&self, id: Uuid) -> Option<Channel> {
        self.channels.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl ChannelStore for InMemoryChannelStore {
    async fn find(&self, id: Uuid) -> Result<Option<Channel>, AppError> {
        Ok(self.get(id).await)
    }

    async fn is_banned(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.banned.read().await.contains(&id))
    }

    async fn add_emote(&self, id: Uuid, emote_id: Uuid) -> Result<Option<Channel>, AppError> {
        // Held across the status check so a concurrent pull cannot slip in between.
        let mut channels = self.channels.write().await;
        let Some(channel) = channels.get_mut(&id) else {
            return Ok(None);
        };
        if channel.has_emote(emote_id) {
            return Ok(None);
        }
        let live = match &self.emotes {
            Some(emotes) => emotes
                .get(emote_id)
                .await
                .is_some_and(|emote| emote.status == EmoteStatus::Live),
            None => false,
        };
        if !live {
            return Ok(None);
        }
        channel.emotes.push(emote_id);
        Ok(Some(channel.clone()))
    }

    async fn pull_emote(&self, id: Uuid, emote_id: Uuid) -> Result<Option<Channel>, AppError> {
        let mut channels = self.channels.write().await;
        Ok(channels.get_mut(&id).map(|channel| {
            channel.emotes.retain(|e| *e != emote_id);
            channel.clone()
        }))
    }

    async fn pull_emote_everywhere(&self, emote_id: Uuid) -> Result<u64, AppError> {
        let mut channels = self.channels.write().await;
        let mut updated = 0;
        for channel in channels.values_mut() {
            if channel.has_emote(emote_id) {
                channel.emotes.retain(|e| *e != emote_id);
                updated += 1;
            }
        }
        Ok(updated)
    }
}

/// Audit sink keeping entries in memory for assertions.
#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    entries: Arc<RwLock<Vec<AuditLog>>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<AuditLog> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, entry: AuditLog) -> Result<(), AppError> {
        self.entries.write().await.push(entry);
        Ok(())
    }
}
