//! Collaborator interfaces
//!
//! The pipeline decides *when* to authorize, audit and notify; these traits decide *how*.
//! Implementations live in outer crates (database-backed audit log, webhook notifier,
//! permission-based authorizer). The no-op and logging implementations here are used
//! when a collaborator is not configured.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Actor, AuditLog, Emote, EmoteEvent};

/// Yes/no decisions about what an actor may do. The pipeline trusts the answer.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// May `actor` upload new emotes at all?
    async fn may_create(&self, actor: &Actor) -> Result<bool, AppError>;

    /// May `actor` delete `emote`?
    async fn may_delete(&self, actor: &Actor, emote: &Emote) -> Result<bool, AppError>;

    /// May `actor` act on behalf of `owner_id` (upload to it, change its emote list)?
    async fn may_manage(&self, actor: &Actor, owner_id: Uuid) -> Result<bool, AppError>;
}

/// Receives audit entries. Failures are logged by the caller, never propagated.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditLog) -> Result<(), AppError>;
}

/// Receives change notifications for fan-out. Delivery is best-effort.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: EmoteEvent) -> Result<(), AppError>;
}

/// Audit sink that writes entries to the log only.
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: AuditLog) -> Result<(), AppError> {
        tracing::info!(
            kind = entry.kind.as_str(),
            actor_id = %entry.actor_id,
            target_id = %entry.target.id,
            target_kind = entry.target.kind,
            changes = entry.changes.len(),
            reason = entry.reason.as_deref().unwrap_or(""),
            "Audit entry"
        );
        Ok(())
    }
}

/// Event sink that drops everything.
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn publish(&self, event: EmoteEvent) -> Result<(), AppError> {
        tracing::debug!(topic = %event.topic(), "Event dropped (no event sink configured)");
        Ok(())
    }
}
