//! Collaborator fakes shared by the service tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use emotia_core::models::{Emote, EmoteEvent, EmoteStatus, NewEmote};
use emotia_core::{AppError, EventSink, StorageBackend};
use emotia_db::{EmoteStore, InMemoryEmoteStore};
use emotia_processing::{PlannedRendition, TranscodeError, Transcoder};
use emotia_storage::{MemoryStorage, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

fn tier_of(key: &str) -> Option<u8> {
    key.rsplit('/').next().and_then(|s| s.parse().ok())
}

/// Storage wrapper that fails selected tiers.
#[derive(Clone)]
pub struct FailingStorage {
    inner: MemoryStorage,
    put_failures: Arc<Mutex<HashMap<u8, usize>>>,
    expire_failures: Arc<Mutex<HashMap<u8, usize>>>,
    expire_calls: Arc<AtomicUsize>,
}

impl FailingStorage {
    pub fn new(inner: MemoryStorage) -> Self {
        Self {
            inner,
            put_failures: Arc::default(),
            expire_failures: Arc::default(),
            expire_calls: Arc::default(),
        }
    }

    pub fn fail_put_tier(self, tier: u8) -> Self {
        self.put_failures.lock().unwrap().insert(tier, usize::MAX);
        self
    }

    pub fn fail_expire_tier(self, tier: u8) -> Self {
        self.fail_expire_tier_times(tier, usize::MAX)
    }

    /// Fail the first `times` expire calls for `tier`.
    pub fn fail_expire_tier_times(self, tier: u8, times: usize) -> Self {
        self.expire_failures.lock().unwrap().insert(tier, times);
        self
    }

    pub fn expire_calls(&self) -> usize {
        self.expire_calls.load(Ordering::SeqCst)
    }

    fn should_fail(failures: &Mutex<HashMap<u8, usize>>, tier: u8) -> bool {
        let mut failures = failures.lock().unwrap();
        match failures.get_mut(&tier) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn put(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        if tier_of(key).is_some_and(|tier| Self::should_fail(&self.put_failures, tier)) {
            return Err(StorageError::UploadFailed(format!("injected failure for {}", key)));
        }
        self.inner.put(bucket, key, data, content_type).await
    }

    async fn expire(&self, bucket: &str, key_prefix: &str, generation: u8) -> StorageResult<()> {
        self.expire_calls.fetch_add(1, Ordering::SeqCst);
        if Self::should_fail(&self.expire_failures, generation) {
            return Err(StorageError::DeleteFailed(format!(
                "injected failure for {}/{}",
                key_prefix, generation
            )));
        }
        self.inner.expire(bucket, key_prefix, generation).await
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        self.inner.exists(bucket, key).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

/// Transcoder that returns `"{tier}:{w}x{h}"` without spawning anything.
#[derive(Clone, Default)]
pub struct FakeTranscoder {
    fail_tier: Option<u8>,
    calls: Arc<AtomicUsize>,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(tier: u8) -> Self {
        Self {
            fail_tier: Some(tier),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(
        &self,
        _input: &Path,
        rendition: &PlannedRendition,
    ) -> Result<Bytes, TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let tier = rendition.tier.id;
        if self.fail_tier == Some(tier) {
            return Err(TranscodeError::Failed {
                tier,
                status: "exit status: 1".to_string(),
                stderr: "convert: no decode delegate".to_string(),
            });
        }
        Ok(Bytes::from(format!(
            "{}:{}x{}",
            tier, rendition.width, rendition.height
        )))
    }
}

/// Emote store whose inserts report a nil identity.
#[derive(Clone, Default)]
pub struct NilIdEmoteStore {
    inner: InMemoryEmoteStore,
    deleted: Arc<Mutex<Vec<Uuid>>>,
}

impl NilIdEmoteStore {
    pub fn deleted(&self) -> Vec<Uuid> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmoteStore for NilIdEmoteStore {
    async fn insert(&self, _emote: &NewEmote) -> Result<Uuid, AppError> {
        Ok(Uuid::nil())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Emote>, AppError> {
        self.inner.find(id).await
    }

    async fn transition(
        &self,
        id: Uuid,
        from: EmoteStatus,
        to: EmoteStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        self.inner.transition(id, from, to, at).await
    }

    async fn mark_deleted(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError> {
        self.inner.mark_deleted(id, at).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.deleted.lock().unwrap().push(id);
        self.inner.delete(id).await
    }
}

/// Event sink recording every published event.
#[derive(Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<EmoteEvent>>>,
}

impl RecordingEventSink {
    pub fn events(&self) -> Vec<EmoteEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn publish(&self, event: EmoteEvent) -> Result<(), AppError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
