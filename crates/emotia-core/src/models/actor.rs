use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role capabilities the authorization layer reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    EmoteCreate,
    EmoteEditAll,
    ManageUsers,
}

/// The authenticated principal performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub display_name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Actor {
    pub fn new(id: Uuid, display_name: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            permissions,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}
