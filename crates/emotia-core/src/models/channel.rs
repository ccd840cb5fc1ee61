use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A consumer record: a user/channel holding a list of enabled emotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Channel {
    pub id: Uuid,
    pub display_name: String,
    /// Enabled emote ids, in the order they were added.
    pub emotes: Vec<Uuid>,
    /// Users allowed to manage this channel's emotes.
    pub editors: Vec<Uuid>,
}

impl Channel {
    pub fn has_emote(&self, emote_id: Uuid) -> bool {
        self.emotes.contains(&emote_id)
    }

    pub fn is_editor(&self, user_id: Uuid) -> bool {
        self.editors.contains(&user_id)
    }
}
