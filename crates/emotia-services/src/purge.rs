//! Rendition purge after deletion
//!
//! Runs only once the Deleted state is durable. Every step is best-effort: failures
//! are reported and logged but never undo the deletion.

use emotia_core::AppError;
use emotia_db::ChannelStore;
use emotia_storage::{emote_prefix, Storage};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Outcome of one purge cycle, for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    /// Tiers whose object was expired.
    pub purged: Vec<u8>,
    /// Tiers still present after every attempt.
    pub failed: Vec<u8>,
    /// Channels that had the emote pulled; `None` when the scan itself failed.
    pub consumers_updated: Option<u64>,
}

impl PurgeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.consumers_updated.is_some()
    }
}

#[derive(Clone)]
pub struct PurgeOrchestrator {
    storage: Arc<dyn Storage>,
    channels: Arc<dyn ChannelStore>,
    bucket: String,
    tiers: Vec<u8>,
    attempts: u32,
    backoff: Duration,
}

impl PurgeOrchestrator {
    pub fn new(
        storage: Arc<dyn Storage>,
        channels: Arc<dyn ChannelStore>,
        bucket: impl Into<String>,
        tiers: Vec<u8>,
        attempts: u32,
    ) -> Self {
        Self {
            storage,
            channels,
            bucket: bucket.into(),
            tiers,
            attempts: attempts.max(1),
            backoff: Duration::from_millis(250),
        }
    }

    /// Delay before retry `n` is `n * backoff`.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Expire every tier concurrently, then pull the emote from all channels.
    #[tracing::instrument(skip(self), fields(emote_id = %emote_id))]
    pub async fn purge(&self, emote_id: Uuid) -> PurgeReport {
        let prefix = emote_prefix(emote_id);
        let mut tasks = Vec::with_capacity(self.tiers.len());

        for &tier in &self.tiers {
            let storage = Arc::clone(&self.storage);
            let bucket = self.bucket.clone();
            let prefix = prefix.clone();
            let attempts = self.attempts;
            let backoff = self.backoff;

            let task = tokio::spawn(async move {
                expire_with_retry(storage.as_ref(), &bucket, &prefix, tier, attempts, backoff).await
            });
            tasks.push((tier, task));
        }

        let mut report = PurgeReport::default();
        for (tier, task) in tasks {
            match task.await {
                Ok(Ok(())) => report.purged.push(tier),
                Ok(Err(e)) => {
                    tracing::error!(emote_id = %emote_id, tier, error = %e, "Rendition purge failed");
                    report.failed.push(tier);
                }
                Err(e) => {
                    tracing::error!(emote_id = %emote_id, tier, error = %e, "Purge task failed");
                    report.failed.push(tier);
                }
            }
        }

        report.consumers_updated = match self.channels.pull_emote_everywhere(emote_id).await {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::error!(emote_id = %emote_id, error = %e, "Failed to pull emote from channels");
                None
            }
        };

        report
    }
}

async fn expire_with_retry(
    storage: &dyn Storage,
    bucket: &str,
    prefix: &str,
    tier: u8,
    attempts: u32,
    backoff: Duration,
) -> Result<(), AppError> {
    let mut attempt = 1;
    loop {
        match storage.expire(bucket, prefix, tier).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt >= attempts => return Err(e.into()),
            Err(e) => {
                tracing::warn!(
                    prefix = %prefix,
                    tier,
                    attempt,
                    error = %e,
                    "Rendition purge attempt failed, retrying"
                );
                tokio::time::sleep(backoff * attempt).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FailingStorage;
    use bytes::Bytes;
    use emotia_core::models::Channel;
    use emotia_db::InMemoryChannelStore;
    use emotia_storage::{rendition_key, MemoryStorage};

    async fn seeded(storage: &MemoryStorage, id: Uuid) {
        for tier in 1..=4u8 {
            storage
                .put("emotes", &rendition_key(id, tier), Bytes::from_static(b"x"), "image/webp")
                .await
                .unwrap();
        }
    }

    fn orchestrator(storage: Arc<dyn Storage>, channels: Arc<dyn ChannelStore>) -> PurgeOrchestrator {
        PurgeOrchestrator::new(storage, channels, "emotes", vec![1, 2, 3, 4], 3)
            .with_backoff(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_purges_all_tiers_and_consumers() {
        let storage = MemoryStorage::new();
        let channels = InMemoryChannelStore::new();
        let id = Uuid::new_v4();
        seeded(&storage, id).await;
        channels
            .put(Channel {
                id: Uuid::new_v4(),
                display_name: "forsen".to_string(),
                emotes: vec![id],
                editors: vec![],
            })
            .await;

        let report = orchestrator(Arc::new(storage.clone()), Arc::new(channels))
            .purge(id)
            .await;

        assert_eq!(report.purged, vec![1, 2, 3, 4]);
        assert!(report.failed.is_empty());
        assert_eq!(report.consumers_updated, Some(1));
        assert!(storage.keys("emotes").await.is_empty());
    }

    #[tokio::test]
    async fn test_one_failing_tier_does_not_block_others() {
        let inner = MemoryStorage::new();
        let id = Uuid::new_v4();
        seeded(&inner, id).await;
        let storage = FailingStorage::new(inner.clone()).fail_expire_tier(3);

        let report = orchestrator(Arc::new(storage.clone()), Arc::new(InMemoryChannelStore::new()))
            .purge(id)
            .await;

        assert_eq!(report.purged, vec![1, 2, 4]);
        assert_eq!(report.failed, vec![3]);
        assert!(!report.is_complete());
        assert_eq!(inner.keys("emotes").await, vec![rendition_key(id, 3)]);
        // three attempts for the failing tier, one for each of the others
        assert_eq!(storage.expire_calls(), 6);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let inner = MemoryStorage::new();
        let id = Uuid::new_v4();
        seeded(&inner, id).await;
        let storage = FailingStorage::new(inner.clone()).fail_expire_tier_times(2, 1);

        let report = orchestrator(Arc::new(storage), Arc::new(InMemoryChannelStore::new()))
            .purge(id)
            .await;

        assert_eq!(report.purged, vec![1, 2, 3, 4]);
        assert!(inner.keys("emotes").await.is_empty());
    }
}
