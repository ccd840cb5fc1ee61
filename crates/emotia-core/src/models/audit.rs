use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLogKind {
    EmoteCreate,
    EmoteDelete,
    ChannelEmoteAdd,
    ChannelEmoteRemove,
}

impl AuditLogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditLogKind::EmoteCreate => "emote_create",
            AuditLogKind::EmoteDelete => "emote_delete",
            AuditLogKind::ChannelEmoteAdd => "channel_emote_add",
            AuditLogKind::ChannelEmoteRemove => "channel_emote_remove",
        }
    }
}

/// One field-level change: `key` went from `old_value` to `new_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditChange {
    pub key: String,
    pub old_value: JsonValue,
    pub new_value: JsonValue,
}

impl AuditChange {
    pub fn new(key: &str, old_value: impl Serialize, new_value: impl Serialize) -> Self {
        Self {
            key: key.to_string(),
            old_value: serde_json::to_value(old_value).unwrap_or(JsonValue::Null),
            new_value: serde_json::to_value(new_value).unwrap_or(JsonValue::Null),
        }
    }

    /// A change with no previous value, used for freshly created records.
    pub fn created(key: &str, new_value: impl Serialize) -> Self {
        Self::new(key, JsonValue::Null, new_value)
    }
}

/// Entity an audit entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditTarget {
    pub id: Uuid,
    pub kind: &'static str,
}

impl AuditTarget {
    pub fn emote(id: Uuid) -> Self {
        Self { id, kind: "emotes" }
    }

    pub fn channel(id: Uuid) -> Self {
        Self { id, kind: "users" }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLog {
    pub kind: AuditLogKind,
    pub actor_id: Uuid,
    pub target: AuditTarget,
    pub changes: Vec<AuditChange>,
    pub reason: Option<String>,
}
