use async_trait::async_trait;
use emotia_core::models::{Actor, Emote, Permission};
use emotia_core::{AppError, Authorizer};
use emotia_db::ChannelStore;
use std::sync::Arc;
use uuid::Uuid;

/// Role-based authorizer: capabilities come from the actor's permissions,
/// delegation from the owner channel's editor list.
#[derive(Clone)]
pub struct PermissionAuthorizer {
    channels: Arc<dyn ChannelStore>,
}

impl PermissionAuthorizer {
    pub fn new(channels: Arc<dyn ChannelStore>) -> Self {
        Self { channels }
    }

    async fn is_editor_of(&self, actor: &Actor, owner_id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .channels
            .find(owner_id)
            .await?
            .is_some_and(|owner| owner.is_editor(actor.id)))
    }
}

#[async_trait]
impl Authorizer for PermissionAuthorizer {
    async fn may_create(&self, actor: &Actor) -> Result<bool, AppError> {
        Ok(actor.has_permission(Permission::EmoteCreate))
    }

    async fn may_delete(&self, actor: &Actor, emote: &Emote) -> Result<bool, AppError> {
        if actor.has_permission(Permission::EmoteEditAll) || emote.owner_id == actor.id {
            return Ok(true);
        }
        self.is_editor_of(actor, emote.owner_id).await
    }

    async fn may_manage(&self, actor: &Actor, owner_id: Uuid) -> Result<bool, AppError> {
        if actor.has_permission(Permission::ManageUsers) || owner_id == actor.id {
            return Ok(true);
        }
        self.is_editor_of(actor, owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use emotia_core::models::{Channel, EmoteStatus, NewEmote, Visibility, RENDITION_MIME};
    use emotia_db::InMemoryChannelStore;

    fn emote(owner_id: Uuid) -> Emote {
        NewEmote {
            name: "KEKW".to_string(),
            owner_id,
            status: EmoteStatus::Live,
            visibility: Visibility::initial(),
            mime: RENDITION_MIME.to_string(),
            tags: vec![],
            width: [1; 4],
            height: [1; 4],
            last_modified: Utc::now(),
        }
        .into_emote(Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_delete_rights() {
        let channels = InMemoryChannelStore::new();
        let owner = Uuid::new_v4();
        let editor = Actor::new(Uuid::new_v4(), "editor", vec![]);
        channels
            .put(Channel {
                id: owner,
                display_name: "owner".to_string(),
                emotes: vec![],
                editors: vec![editor.id],
            })
            .await;
        let authorizer = PermissionAuthorizer::new(Arc::new(channels));
        let e = emote(owner);

        let admin = Actor::new(Uuid::new_v4(), "admin", vec![Permission::EmoteEditAll]);
        let stranger = Actor::new(Uuid::new_v4(), "stranger", vec![Permission::EmoteCreate]);

        assert!(authorizer.may_delete(&admin, &e).await.unwrap());
        assert!(authorizer.may_delete(&editor, &e).await.unwrap());
        assert!(authorizer
            .may_delete(&Actor::new(owner, "owner", vec![]), &e)
            .await
            .unwrap());
        assert!(!authorizer.may_delete(&stranger, &e).await.unwrap());
    }

    #[tokio::test]
    async fn test_manage_rights() {
        let authorizer = PermissionAuthorizer::new(Arc::new(InMemoryChannelStore::new()));
        let actor = Actor::new(Uuid::new_v4(), "someone", vec![]);
        let mod_actor = Actor::new(Uuid::new_v4(), "mod", vec![Permission::ManageUsers]);

        assert!(authorizer.may_manage(&actor, actor.id).await.unwrap());
        assert!(!authorizer.may_manage(&actor, Uuid::new_v4()).await.unwrap());
        assert!(authorizer.may_manage(&mod_actor, Uuid::new_v4()).await.unwrap());
        assert!(!authorizer.may_create(&actor).await.unwrap());
    }
}
