//! Discord webhook notifications for emote creation and deletion.

use async_trait::async_trait;
use emotia_core::models::EmoteEvent;
use emotia_core::{AppError, EventSink};
use serde_json::{json, Value};
use std::time::Duration;

const COLOR_CREATED: u32 = 0x2ECC71;
const COLOR_DELETED: u32 = 0xE74C3C;

/// Posts create/delete events to a Discord webhook. Delivery runs detached;
/// a failed post is logged and dropped.
#[derive(Clone)]
pub struct DiscordWebhookSink {
    http_client: reqwest::Client,
    webhook_url: String,
}

impl DiscordWebhookSink {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create Discord HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            webhook_url: webhook_url.into(),
        })
    }

    /// Webhook body for `event`, or `None` for events Discord does not receive.
    fn payload(event: &EmoteEvent) -> Option<Value> {
        match event {
            EmoteEvent::Created { emote, actor } => Some(json!({
                "embeds": [{
                    "title": format!("Emote Created: {}", emote.name),
                    "color": COLOR_CREATED,
                    "fields": [
                        { "name": "ID", "value": emote.id.to_string(), "inline": true },
                        { "name": "Uploader", "value": actor.display_name, "inline": true },
                    ],
                    "timestamp": emote.created_at.to_rfc3339(),
                }]
            })),
            EmoteEvent::Deleted {
                emote,
                actor,
                reason,
            } => Some(json!({
                "embeds": [{
                    "title": format!("Emote Deleted: {}", emote.name),
                    "description": format!("Reason: {}", reason),
                    "color": COLOR_DELETED,
                    "fields": [
                        { "name": "ID", "value": emote.id.to_string(), "inline": true },
                        { "name": "Deleted By", "value": actor.display_name, "inline": true },
                    ],
                    "timestamp": emote.last_modified.to_rfc3339(),
                }]
            })),
            EmoteEvent::ChannelEmotes { .. } => None,
        }
    }
}

#[async_trait]
impl EventSink for DiscordWebhookSink {
    async fn publish(&self, event: EmoteEvent) -> Result<(), AppError> {
        let topic = event.topic();
        let Some(body) = Self::payload(&event) else {
            tracing::debug!(topic = %topic, "Event not forwarded to Discord");
            return Ok(());
        };

        let client = self.http_client.clone();
        let url = self.webhook_url.clone();
        tokio::spawn(async move {
            match client.post(&url).json(&body).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(topic = %topic, "Discord notification sent");
                }
                Ok(response) => {
                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    tracing::warn!(
                        topic = %topic,
                        status = %status,
                        error = %error_text,
                        "Discord webhook rejected notification"
                    );
                }
                Err(e) => {
                    tracing::warn!(topic = %topic, error = %e, "Discord webhook request failed");
                }
            }
        });

        Ok(())
    }
}
