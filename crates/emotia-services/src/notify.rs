//! Best-effort post-commit steps. Failures are logged, never returned.

use emotia_core::models::{AuditLog, EmoteEvent};
use emotia_core::{AuditSink, EventSink};

pub(crate) async fn record_audit(sink: &dyn AuditSink, entry: AuditLog) {
    let kind = entry.kind.as_str();
    let target_id = entry.target.id;
    if let Err(e) = sink.record(entry).await {
        tracing::error!(error = %e, kind, target_id = %target_id, "Failed to record audit entry");
    }
}

pub(crate) async fn publish_event(sink: &dyn EventSink, event: EmoteEvent) {
    let topic = event.topic();
    if let Err(e) = sink.publish(event).await {
        tracing::warn!(error = %e, topic = %topic, "Failed to publish event");
    }
}
