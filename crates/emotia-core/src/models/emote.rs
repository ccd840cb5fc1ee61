use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of rendition tiers every emote is published at.
pub const TIER_COUNT: usize = 4;

/// MIME type shared by every rendition of an emote.
pub const RENDITION_MIME: &str = "image/webp";

/// Lifecycle state of an emote record.
///
/// `Processing` is entered when the record is inserted, `Live` once every
/// rendition is durable, and `Deleted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "emote_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum EmoteStatus {
    Processing,
    Live,
    Deleted,
}

impl EmoteStatus {
    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: EmoteStatus) -> bool {
        matches!(
            (self, next),
            (EmoteStatus::Processing, EmoteStatus::Live)
                | (EmoteStatus::Live, EmoteStatus::Deleted)
                | (EmoteStatus::Processing, EmoteStatus::Deleted)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == EmoteStatus::Deleted
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmoteStatus::Processing => "processing",
            EmoteStatus::Live => "live",
            EmoteStatus::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for EmoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility attributes of an emote. Each flag toggles independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    /// Only the owner and the sharing list may enable the emote.
    pub private: bool,
    /// Omitted from public listings.
    pub hidden: bool,
    /// Shared beyond the owner through `shared_with`.
    pub shared: bool,
    /// Enabled for every channel.
    pub global: bool,
}

impl Visibility {
    /// Flags a freshly uploaded emote starts with.
    pub fn initial() -> Self {
        Self {
            private: true,
            hidden: true,
            ..Self::default()
        }
    }
}

/// Persisted emote record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emote {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub status: EmoteStatus,
    pub visibility: Visibility,
    pub mime: String,
    pub tags: Vec<String>,
    /// Rendition widths indexed by tier (tier 1 at index 0).
    pub width: [i16; TIER_COUNT],
    /// Rendition heights indexed by tier (tier 1 at index 0).
    pub height: [i16; TIER_COUNT],
    pub shared_with: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Emote {
    /// Whether `channel_id` may enable this emote given its visibility.
    pub fn is_enableable_by(&self, channel_id: Uuid) -> bool {
        if !self.visibility.private {
            return true;
        }
        self.owner_id == channel_id || self.shared_with.contains(&channel_id)
    }
}

/// Fields supplied when inserting a new emote record. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewEmote {
    pub name: String,
    pub owner_id: Uuid,
    pub status: EmoteStatus,
    pub visibility: Visibility,
    pub mime: String,
    pub tags: Vec<String>,
    pub width: [i16; TIER_COUNT],
    pub height: [i16; TIER_COUNT],
    pub last_modified: DateTime<Utc>,
}

impl NewEmote {
    /// Materialize the record the store would hold under `id`.
    pub fn into_emote(self, id: Uuid) -> Emote {
        Emote {
            id,
            name: self.name,
            owner_id: self.owner_id,
            status: self.status,
            visibility: self.visibility,
            mime: self.mime,
            tags: self.tags,
            width: self.width,
            height: self.height,
            shared_with: Vec::new(),
            created_at: self.last_modified,
            last_modified: self.last_modified,
        }
    }
}
