use async_trait::async_trait;
use emotia_core::models::Channel;
use emotia_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Record-store operations on consumer records (channels holding enabled emote ids)
#[async_trait]
pub trait ChannelStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Channel>, AppError>;

    async fn is_banned(&self, id: Uuid) -> Result<bool, AppError>;

    /// Append `emote_id` to one channel in a single statement, only while the emote is live and
    /// not already enabled there. `None` when any of those conditions failed.
    async fn add_emote(&self, id: Uuid, emote_id: Uuid) -> Result<Option<Channel>, AppError>;

    /// Atomically remove `emote_id` from one channel and return the updated record.
    async fn pull_emote(&self, id: Uuid, emote_id: Uuid) -> Result<Option<Channel>, AppError>;

    /// Remove `emote_id` from every channel that has it. Returns the number of channels updated.
    async fn pull_emote_everywhere(&self, emote_id: Uuid) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct ChannelRepository {
    pool: PgPool,
}

impl ChannelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelStore for ChannelRepository {
    #[tracing::instrument(skip(self), fields(db.table = "channels", db.operation = "select"))]
    async fn find(&self, id: Uuid) -> Result<Option<Channel>, AppError> {
        let channel = sqlx::query_as::<Postgres, Channel>(
            r#"
            SELECT id, display_name, emotes, editors
            FROM channels
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, channel_id = %id, "Failed to get channel");
            AppError::Database(e)
        })?;

        Ok(channel)
    }

    #[tracing::instrument(skip(self), fields(db.table = "channels", db.operation = "select"))]
    async fn is_banned(&self, id: Uuid) -> Result<bool, AppError> {
        let banned: Option<bool> =
            sqlx::query_scalar::<Postgres, bool>("SELECT banned FROM channels WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, channel_id = %id, "Failed to check channel ban");
                    AppError::Database(e)
                })?;

        Ok(banned.unwrap_or(false))
    }

    #[tracing::instrument(skip(self), fields(db.table = "channels", db.operation = "update"))]
    async fn add_emote(&self, id: Uuid, emote_id: Uuid) -> Result<Option<Channel>, AppError> {
        let channel = sqlx::query_as::<Postgres, Channel>(
            r#"
            UPDATE channels
            SET emotes = array_append(emotes, $2)
            WHERE id = $1
              AND NOT emotes @> ARRAY[$2]::uuid[]
              AND EXISTS (SELECT 1 FROM emotes WHERE id = $2 AND status = 'live')
            RETURNING id, display_name, emotes, editors
            "#,
        )
        .bind(id)
        .bind(emote_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, channel_id = %id, emote_id = %emote_id, "Failed to add channel emote");
            AppError::Database(e)
        })?;

        Ok(channel)
    }

    #[tracing::instrument(skip(self), fields(db.table = "channels", db.operation = "update"))]
    async fn pull_emote(&self, id: Uuid, emote_id: Uuid) -> Result<Option<Channel>, AppError> {
        let channel = sqlx::query_as::<Postgres, Channel>(
            r#"
            UPDATE channels
            SET emotes = array_remove(emotes, $2)
            WHERE id = $1
            RETURNING id, display_name, emotes, editors
            "#,
        )
        .bind(id)
        .bind(emote_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, channel_id = %id, emote_id = %emote_id, "Failed to pull channel emote");
            AppError::Database(e)
        })?;

        Ok(channel)
    }

    #[tracing::instrument(skip(self), fields(db.table = "channels", db.operation = "update"))]
    async fn pull_emote_everywhere(&self, emote_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE channels
            SET emotes = array_remove(emotes, $1)
            WHERE emotes @> ARRAY[$1]::uuid[]
            "#,
        )
        .bind(emote_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, emote_id = %emote_id, "Failed to pull emote from channels");
            AppError::Database(e)
        })?;

        Ok(result.rows_affected())
    }
}
