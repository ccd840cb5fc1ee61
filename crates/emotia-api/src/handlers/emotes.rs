use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use emotia_core::models::{Emote, EmoteStatus};
use emotia_core::validation::MAX_EMOTE_NAME_BYTES;
use emotia_core::AppError;
use emotia_processing::{ScratchWorkspace, SourceFormat, ValidationError};
use emotia_services::IngestRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::auth::AuthenticatedActor;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::{AppState, UploadConfig};

/// Parts read from an ingest request; anything beyond this is ignored.
const MAX_PARTS: usize = 3;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub status: u16,
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DeleteEmoteRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: Uuid,
    pub name: String,
    pub status: EmoteStatus,
}

impl From<&Emote> for DeletedResponse {
    fn from(emote: &Emote) -> Self {
        Self {
            id: emote.id,
            name: emote.name.clone(),
            status: emote.status,
        }
    }
}

fn multipart_error(e: impl std::fmt::Display) -> HttpAppError {
    HttpAppError(AppError::InvalidInput(format!(
        "Failed to read multipart: {}",
        e
    )))
}

/// Read a text part, keeping at most `limit + 1` bytes so overlong values are still detected.
async fn read_capped(field: &mut Field<'_>, limit: usize) -> Result<Vec<u8>, HttpAppError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        let room = (limit + 1).saturating_sub(buf.len());
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
        if buf.len() > limit {
            break;
        }
    }
    Ok(buf)
}

/// Stream the file part into the workspace original, enforcing the size cap as bytes arrive.
async fn stream_original(
    field: &mut Field<'_>,
    workspace: &ScratchWorkspace,
    upload: &UploadConfig,
) -> Result<usize, HttpAppError> {
    let mut file = workspace.original_writer().await.map_err(AppError::from)?;
    let max = upload.validator.max_file_size();
    let mut written = 0usize;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        written += chunk.len();
        if written > max {
            return Err(ValidationError::FileTooLarge { size: written, max }.into());
        }
        file.write_all(&chunk).await.map_err(AppError::from)?;
    }
    file.flush().await.map_err(AppError::from)?;

    upload.validator.validate_file_size(written)?;
    Ok(written)
}

/// Ingest a new emote
///
/// Multipart parts: `name` (optional, inferred from the file name when absent),
/// `channel` (optional owner id, defaults to the caller) and `emote` (the file).
#[tracing::instrument(
    skip(state, actor, multipart),
    fields(user_id = %actor.id, operation = "create_emote")
)]
pub async fn create_emote(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = &state.upload;
    let mut name: Option<String> = None;
    let mut channel_id: Option<Uuid> = None;
    let mut file: Option<(ScratchWorkspace, SourceFormat, Option<String>)> = None;

    let mut parts = 0;
    while parts < MAX_PARTS {
        let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? else {
            break;
        };
        parts += 1;

        let part = field.name().unwrap_or_default().to_string();
        match part.as_str() {
            "name" => {
                let raw = read_capped(&mut field, MAX_EMOTE_NAME_BYTES).await?;
                name = Some(upload.validator.validate_name(&raw)?);
            }
            "channel" => {
                let raw = read_capped(&mut field, 64).await?;
                let raw = String::from_utf8_lossy(&raw);
                channel_id = Some(upload.validator.parse_channel_id(&raw)?);
            }
            "emote" if file.is_none() => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let format = upload.validator.validate_content_type(&content_type)?;
                let file_name = field.file_name().map(str::to_string);

                let workspace = ScratchWorkspace::create(&upload.scratch_root)
                    .await
                    .map_err(AppError::from)?;
                let size = stream_original(&mut field, &workspace, upload).await?;
                tracing::debug!(
                    workspace_id = %workspace.id(),
                    size,
                    content_type = %content_type,
                    "Upload buffered"
                );
                file = Some((workspace, format, file_name));
            }
            other => {
                tracing::debug!(part = other, "Ignoring multipart part");
            }
        }
    }

    let Some((workspace, format, file_name)) = file else {
        return Err(ValidationError::MissingFields.into());
    };

    let emote = state
        .lifecycle
        .ingest(
            &actor,
            IngestRequest {
                name,
                channel_id,
                file_name,
                format,
                workspace,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            status: StatusCode::CREATED.as_u16(),
            id: emote.id,
        }),
    ))
}

/// Delete an emote and purge its renditions
#[tracing::instrument(skip(state, actor, body), fields(user_id = %actor.id, emote_id = %id, operation = "delete_emote"))]
pub async fn delete_emote(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<DeleteEmoteRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state.lifecycle.delete(&actor, &id, &body.reason).await?;
    Ok(Json(DeletedResponse::from(&deleted.emote)))
}
