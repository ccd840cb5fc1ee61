use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use emotia_core::models::Channel;
use emotia_core::AppError;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::AuthenticatedActor;
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChannelEmoteRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// The body is optional; an empty one means no reason.
fn parse_reason(body: &Bytes) -> Result<Option<String>, HttpAppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let request: ChannelEmoteRequest = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e)))?;
    Ok(request.reason)
}

/// Enable an emote on a channel
#[tracing::instrument(
    skip(state, actor, body),
    fields(user_id = %actor.id, channel_id = %channel_id, emote_id = %emote_id)
)]
pub async fn add_channel_emote(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path((channel_id, emote_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let reason = parse_reason(&body)?;
    let channel: Channel = state
        .channel_emotes
        .add(&actor, &channel_id, &emote_id, reason)
        .await?;
    Ok(Json(channel))
}

/// Disable an emote on a channel
#[tracing::instrument(
    skip(state, actor, body),
    fields(user_id = %actor.id, channel_id = %channel_id, emote_id = %emote_id)
)]
pub async fn remove_channel_emote(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path((channel_id, emote_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let reason = parse_reason(&body)?;
    let channel = state
        .channel_emotes
        .remove(&actor, &channel_id, &emote_id, reason)
        .await?;
    Ok(Json(channel))
}
