//! Shared key generation for storage backends.
//!
//! Key format: `emote/{emote_id}/{tier}`. All backends must use these helpers.

use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Prefix under which every rendition of an emote is stored.
pub fn emote_prefix(emote_id: Uuid) -> String {
    format!("emote/{}", emote_id)
}

/// Key of the rendition produced for `tier`.
pub fn rendition_key(emote_id: Uuid, tier: u8) -> String {
    generation_key(&emote_prefix(emote_id), tier)
}

/// Key addressed by `expire(prefix, generation)`.
pub fn generation_key(prefix: &str, generation: u8) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), generation)
}

/// Reject keys and bucket names that could escape their namespace.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}
