use crate::keys::{generation_key, validate_key};
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Object held by [`MemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// In-process storage backend for development and tests.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<RwLock<HashMap<(String, String), StoredObject>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one object, if present.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Sorted keys currently stored in `bucket`.
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        validate_key(key)?;
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn expire(&self, bucket: &str, key_prefix: &str, generation: u8) -> StorageResult<()> {
        let key = generation_key(key_prefix, generation);
        validate_key(&key)?;
        self.objects
            .write()
            .await
            .remove(&(bucket.to_string(), key));
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        Ok(self.object(bucket, key).await.is_some())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_records_content_type() {
        let storage = MemoryStorage::new();
        storage
            .put("emotes", "emote/a/1", Bytes::from_static(b"x"), "image/webp")
            .await
            .unwrap();

        let object = storage.object("emotes", "emote/a/1").await.unwrap();
        assert_eq!(object.content_type, "image/webp");
        assert!(storage.object("other", "emote/a/1").await.is_none());
    }

    #[tokio::test]
    async fn test_expire_targets_single_generation() {
        let storage = MemoryStorage::new();
        for tier in 1..=4u8 {
            storage
                .put(
                    "emotes",
                    &format!("emote/a/{}", tier),
                    Bytes::from_static(b"x"),
                    "image/webp",
                )
                .await
                .unwrap();
        }

        storage.expire("emotes", "emote/a", 2).await.unwrap();

        assert_eq!(
            storage.keys("emotes").await,
            vec!["emote/a/1", "emote/a/3", "emote/a/4"]
        );
    }
}
