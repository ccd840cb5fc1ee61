//! Emotia Storage Library
//!
//! Object storage abstraction for rendition files, with S3, local filesystem and
//! in-memory backends.
//!
//! # Storage key format
//!
//! Every rendition lives at `emote/{emote_id}/{tier}` inside the CDN bucket. Purging
//! addresses the same objects as `(prefix = "emote/{emote_id}", generation = tier)`.
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use emotia_core::StorageBackend;
pub use factory::create_storage;
pub use keys::{emote_prefix, generation_key, rendition_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
