use async_trait::async_trait;
use emotia_core::models::AuditLog;
use emotia_core::{AppError, AuditSink};
use sqlx::PgPool;

/// Persists audit entries to `audit_logs`.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for AuditLogRepository {
    #[tracing::instrument(skip(self, entry), fields(
        db.table = "audit_logs",
        db.operation = "insert",
        kind = entry.kind.as_str(),
        target_id = %entry.target.id
    ))]
    async fn record(&self, entry: AuditLog) -> Result<(), AppError> {
        let changes = serde_json::to_value(&entry.changes)?;

        sqlx::query(
            r#"
            INSERT INTO audit_logs (kind, actor_id, target_id, target_kind, changes, reason)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.kind.as_str())
        .bind(entry.actor_id)
        .bind(entry.target.id)
        .bind(entry.target.kind)
        .bind(changes)
        .bind(&entry.reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                kind = entry.kind.as_str(),
                actor_id = %entry.actor_id,
                "Failed to insert audit log"
            );
            AppError::Database(e)
        })?;

        Ok(())
    }
}
