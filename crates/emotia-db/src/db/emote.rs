use async_trait::async_trait;
use chrono::{DateTime, Utc};
use emotia_core::models::{Emote, EmoteStatus, NewEmote, Visibility, TIER_COUNT};
use emotia_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

/// Record-store operations on emotes
#[async_trait]
pub trait EmoteStore: Send + Sync {
    /// Insert a record and return the identity the store assigned to it.
    async fn insert(&self, emote: &NewEmote) -> Result<Uuid, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Emote>, AppError>;

    /// Move `id` from `from` to `to`. Returns false when the record was not in `from`.
    async fn transition(
        &self,
        id: Uuid,
        from: EmoteStatus,
        to: EmoteStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    /// Flip any non-deleted record to Deleted. Returns false if nothing changed.
    async fn mark_deleted(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError>;

    /// Physically remove the record. Used only for compensating deletes.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Debug, FromRow)]
struct EmoteRow {
    id: Uuid,
    name: String,
    owner_id: Uuid,
    status: EmoteStatus,
    is_private: bool,
    is_hidden: bool,
    is_shared: bool,
    is_global: bool,
    mime: String,
    tags: Vec<String>,
    width: Vec<i16>,
    height: Vec<i16>,
    shared_with: Vec<Uuid>,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

/// Reject moves the emote state machine does not allow before touching the store.
pub(crate) fn ensure_transition(from: EmoteStatus, to: EmoteStatus) -> Result<(), AppError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::Internal(format!(
            "Illegal emote status transition {} -> {}",
            from, to
        )))
    }
}

fn tier_array(id: Uuid, column: &str, values: Vec<i16>) -> Result<[i16; TIER_COUNT], AppError> {
    let len = values.len();
    values.try_into().map_err(|_| {
        AppError::Internal(format!(
            "Emote {} has {} {} entries, expected {}",
            id, len, column, TIER_COUNT
        ))
    })
}

impl EmoteRow {
    fn into_emote(self) -> Result<Emote, AppError> {
        Ok(Emote {
            width: tier_array(self.id, "width", self.width)?,
            height: tier_array(self.id, "height", self.height)?,
            id: self.id,
            name: self.name,
            owner_id: self.owner_id,
            status: self.status,
            visibility: Visibility {
                private: self.is_private,
                hidden: self.is_hidden,
                shared: self.is_shared,
                global: self.is_global,
            },
            mime: self.mime,
            tags: self.tags,
            shared_with: self.shared_with,
            created_at: self.created_at,
            last_modified: self.last_modified,
        })
    }
}

#[derive(Clone)]
pub struct EmoteRepository {
    pool: PgPool,
}

impl EmoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmoteStore for EmoteRepository {
    #[tracing::instrument(skip(self, emote), fields(db.table = "emotes", db.operation = "insert", owner_id = %emote.owner_id))]
    async fn insert(&self, emote: &NewEmote) -> Result<Uuid, AppError> {
        let (id,): (Uuid,) = sqlx::query_as::<Postgres, (Uuid,)>(
            r#"
            INSERT INTO emotes (
                name, owner_id, status, is_private, is_hidden, is_shared, is_global,
                mime, tags, width, height, created_at, last_modified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING id
            "#,
        )
        .bind(&emote.name)
        .bind(emote.owner_id)
        .bind(emote.status)
        .bind(emote.visibility.private)
        .bind(emote.visibility.hidden)
        .bind(emote.visibility.shared)
        .bind(emote.visibility.global)
        .bind(&emote.mime)
        .bind(&emote.tags)
        .bind(emote.width.to_vec())
        .bind(emote.height.to_vec())
        .bind(emote.last_modified)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, name = %emote.name, "Failed to insert emote");
            AppError::Database(e)
        })?;

        tracing::debug!(emote_id = %id, name = %emote.name, "Emote record inserted");

        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(db.table = "emotes", db.operation = "select"))]
    async fn find(&self, id: Uuid) -> Result<Option<Emote>, AppError> {
        let row = sqlx::query_as::<Postgres, EmoteRow>(
            r#"
            SELECT id, name, owner_id, status, is_private, is_hidden, is_shared, is_global,
                   mime, tags, width, height, shared_with, created_at, last_modified
            FROM emotes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, emote_id = %id, "Failed to get emote");
            AppError::Database(e)
        })?;

        row.map(EmoteRow::into_emote).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "emotes", db.operation = "update"))]
    async fn transition(
        &self,
        id: Uuid,
        from: EmoteStatus,
        to: EmoteStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        ensure_transition(from, to)?;

        let result = sqlx::query(
            r#"
            UPDATE emotes
            SET status = $3, last_modified = $4
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, emote_id = %id, from = %from, to = %to, "Failed to update emote status");
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "emotes", db.operation = "update"))]
    async fn mark_deleted(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE emotes
            SET status = 'deleted', last_modified = $2
            WHERE id = $1 AND status <> 'deleted'
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, emote_id = %id, "Failed to mark emote deleted");
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "emotes", db.operation = "delete"))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM emotes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, emote_id = %id, "Failed to delete emote");
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
