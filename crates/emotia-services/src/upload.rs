//! Upload coordinator
//!
//! Fans rendition uploads out to one task per tier and joins all of them before
//! reporting. Storage writes are not transactional; the all-or-nothing guarantee comes
//! from the caller never marking a record Live unless every tier landed.

use bytes::Bytes;
use emotia_core::models::RENDITION_MIME;
use emotia_core::AppError;
use emotia_storage::{rendition_key, Storage};
use std::sync::Arc;
use uuid::Uuid;

/// One encoded rendition ready for upload.
#[derive(Debug, Clone)]
pub struct EncodedRendition {
    pub tier: u8,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierFailure {
    pub tier: u8,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
#[error("Upload failed for tier(s) {}", tiers_display(.failures))]
pub struct UploadError {
    pub failures: Vec<TierFailure>,
}

fn tiers_display(failures: &[TierFailure]) -> String {
    failures
        .iter()
        .map(|f| f.tier.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl UploadError {
    pub fn failed_tiers(&self) -> Vec<u8> {
        self.failures.iter().map(|f| f.tier).collect()
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Upload(err.to_string())
    }
}

#[derive(Clone)]
pub struct UploadCoordinator {
    storage: Arc<dyn Storage>,
    bucket: String,
}

impl UploadCoordinator {
    pub fn new(storage: Arc<dyn Storage>, bucket: impl Into<String>) -> Self {
        Self {
            storage,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload every rendition of `emote_id` concurrently.
    ///
    /// Waits for all workers, then fails if any one of them failed.
    #[tracing::instrument(skip(self, renditions), fields(emote_id = %emote_id, count = renditions.len()))]
    pub async fn upload_all(
        &self,
        emote_id: Uuid,
        renditions: Vec<EncodedRendition>,
    ) -> Result<(), UploadError> {
        let mut tasks = Vec::with_capacity(renditions.len());

        for rendition in renditions {
            let storage = Arc::clone(&self.storage);
            let bucket = self.bucket.clone();
            let key = rendition_key(emote_id, rendition.tier);
            let tier = rendition.tier;

            let task = tokio::spawn(async move {
                storage
                    .put(&bucket, &key, rendition.data, RENDITION_MIME)
                    .await
            });
            tasks.push((tier, task));
        }

        let mut failures = Vec::new();
        for (tier, task) in tasks {
            let message = match task.await {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(e) => format!("Upload task failed: {}", e),
            };
            tracing::error!(emote_id = %emote_id, tier, error = %message, "Rendition upload failed");
            failures.push(TierFailure { tier, message });
        }

        if failures.is_empty() {
            tracing::info!(emote_id = %emote_id, bucket = %self.bucket, "All renditions uploaded");
            Ok(())
        } else {
            Err(UploadError { failures })
        }
    }
}
