//! Emotia Database Layer
//!
//! Record-store traits for emotes and channels, their PostgreSQL repositories,
//! and the audit-log sink.

// Module declarations
pub mod db;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

// Re-exports: store traits and repositories
pub use db::{
    AuditLogRepository, ChannelRepository, ChannelStore, EmoteRepository, EmoteStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use memory::{InMemoryAuditSink, InMemoryChannelStore, InMemoryEmoteStore};
