//! Emote lifecycle: ingest (Processing → Live) and deletion (→ Deleted).
//!
//! Ingest stages run as barriers: decode, plan, transcode every tier, insert the
//! Processing record, upload every tier, flip to Live. Within the transcode and upload
//! stages tiers run concurrently. Any failure after the insert removes the record again
//! before the error is returned, so no Live emote ever references a partial rendition set.

use chrono::Utc;
use emotia_core::models::{
    Actor, AuditChange, AuditLog, AuditLogKind, AuditTarget, Emote, EmoteEvent, EmoteStatus,
    NewEmote, Visibility, RENDITION_MIME,
};
use emotia_core::validation::{infer_name_from_filename, validate_emote_name};
use emotia_core::{AppError, AuditSink, Authorizer, Config, EventSink};
use emotia_db::{ChannelStore, EmoteStore};
use emotia_processing::{
    dimension_arrays, Decoder, PlannedRendition, RenditionPlanner, ScratchWorkspace,
    SourceFormat, TranscodeError, Transcoder, ValidationError,
};
use emotia_storage::Storage;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::notify::{publish_event, record_audit};
use crate::purge::{PurgeOrchestrator, PurgeReport};
use crate::upload::{EncodedRendition, UploadCoordinator};

/// External capabilities the lifecycle is wired with.
#[derive(Clone)]
pub struct Collaborators {
    pub emotes: Arc<dyn EmoteStore>,
    pub channels: Arc<dyn ChannelStore>,
    pub storage: Arc<dyn Storage>,
    pub transcoder: Arc<dyn Transcoder>,
    pub authorizer: Arc<dyn Authorizer>,
    pub audit: Arc<dyn AuditSink>,
    pub events: Arc<dyn EventSink>,
}

#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    pub bucket: String,
    pub max_frames: usize,
    pub purge_retry_attempts: u32,
}

impl LifecycleSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bucket: config.cdn_bucket().to_string(),
            max_frames: config.max_frame_count(),
            purge_retry_attempts: config.purge_retry_attempts(),
        }
    }
}

/// A validated upload whose original bytes already sit in `workspace`.
#[derive(Debug)]
pub struct IngestRequest {
    pub name: Option<String>,
    pub channel_id: Option<Uuid>,
    pub file_name: Option<String>,
    pub format: SourceFormat,
    pub workspace: ScratchWorkspace,
}

/// Result of a successful deletion. The purge report is informational only.
#[derive(Debug, Clone)]
pub struct DeletedEmote {
    pub emote: Emote,
    pub purge: PurgeReport,
}

pub struct EmoteLifecycle {
    deps: Collaborators,
    decoder: Decoder,
    planner: RenditionPlanner,
    uploads: UploadCoordinator,
    purger: PurgeOrchestrator,
}

pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) if !id.is_nil() => Ok(id),
        _ => Err(AppError::NotFound(not_found.to_string())),
    }
}

fn resolve_name(name: Option<String>, file_name: Option<&str>) -> Result<String, AppError> {
    let name = name
        .filter(|n| !n.is_empty())
        .or_else(|| file_name.map(infer_name_from_filename))
        .filter(|n| !n.is_empty())
        .ok_or(ValidationError::MissingFields)?;

    validate_emote_name(&name).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    Ok(name)
}

impl EmoteLifecycle {
    pub fn new(deps: Collaborators, settings: LifecycleSettings) -> Self {
        let planner = RenditionPlanner::default();
        let tiers = planner.tiers().iter().map(|t| t.id).collect();

        Self {
            decoder: Decoder::new(settings.max_frames),
            uploads: UploadCoordinator::new(Arc::clone(&deps.storage), settings.bucket.clone()),
            purger: PurgeOrchestrator::new(
                Arc::clone(&deps.storage),
                Arc::clone(&deps.channels),
                settings.bucket,
                tiers,
                settings.purge_retry_attempts,
            ),
            planner,
            deps,
        }
    }

    /// Replace the purge orchestrator (retry timing in tests).
    pub fn with_purger(mut self, purger: PurgeOrchestrator) -> Self {
        self.purger = purger;
        self
    }

    /// Run the ingest pipeline and return the Live emote.
    #[tracing::instrument(skip(self, actor, request), fields(actor_id = %actor.id, workspace_id = %request.workspace.id()))]
    pub async fn ingest(&self, actor: &Actor, request: IngestRequest) -> Result<Emote, AppError> {
        let IngestRequest {
            name,
            channel_id,
            file_name,
            format,
            workspace,
        } = request;

        let name = resolve_name(name, file_name.as_deref())?;
        let owner_id = channel_id.unwrap_or(actor.id);

        if !self.deps.authorizer.may_create(actor).await? {
            return Err(AppError::Forbidden("Insufficient Privilege".to_string()));
        }
        if owner_id != actor.id && !self.deps.authorizer.may_manage(actor, owner_id).await? {
            return Err(AppError::Forbidden(
                "You do not have permission to upload to this channel".to_string(),
            ));
        }

        let original = workspace.original_path();
        let geometry = self.decoder.decode_file(&original, format).await?;
        let plan = self.planner.plan(geometry.width, geometry.height)?;
        let (width, height) = dimension_arrays(&plan)?;

        tracing::debug!(
            format = format.content_type(),
            frames = geometry.frame_count,
            width = geometry.width,
            height = geometry.height,
            "Source decoded"
        );

        let encoded = self.transcode_all(&original, &plan).await?;

        let record = NewEmote {
            name,
            owner_id,
            status: EmoteStatus::Processing,
            visibility: Visibility::initial(),
            mime: RENDITION_MIME.to_string(),
            tags: Vec::new(),
            width,
            height,
            last_modified: Utc::now(),
        };

        let id = self.deps.emotes.insert(&record).await?;
        if id.is_nil() {
            tracing::error!(emote_id = %id, "Record store returned a malformed identity");
            self.compensate(id).await;
            return Err(AppError::RecordInconsistency(format!(
                "Insert returned malformed id {}",
                id
            )));
        }

        if let Err(e) = self.uploads.upload_all(id, encoded).await {
            self.compensate(id).await;
            return Err(e.into());
        }

        let live_at = Utc::now();
        match self
            .deps
            .emotes
            .transition(id, EmoteStatus::Processing, EmoteStatus::Live, live_at)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                self.compensate(id).await;
                return Err(AppError::RecordInconsistency(format!(
                    "Emote {} left the processing state during ingest",
                    id
                )));
            }
            Err(e) => {
                self.compensate(id).await;
                return Err(e);
            }
        }

        let mut emote = record.into_emote(id);
        emote.status = EmoteStatus::Live;
        emote.last_modified = live_at;

        tracing::info!(
            emote_id = %id,
            name = %emote.name,
            owner_id = %emote.owner_id,
            "Emote is live"
        );

        record_audit(
            self.deps.audit.as_ref(),
            AuditLog {
                kind: AuditLogKind::EmoteCreate,
                actor_id: actor.id,
                target: AuditTarget::emote(id),
                changes: vec![
                    AuditChange::created("name", &emote.name),
                    AuditChange::created("tags", &emote.tags),
                    AuditChange::created("owner", emote.owner_id),
                    AuditChange::created("visibility", emote.visibility),
                    AuditChange::created("mime", &emote.mime),
                    AuditChange::created("status", EmoteStatus::Processing),
                ],
                reason: None,
            },
        )
        .await;

        publish_event(
            self.deps.events.as_ref(),
            EmoteEvent::Created {
                emote: emote.clone(),
                actor: actor.clone(),
            },
        )
        .await;

        if let Err(e) = workspace.close() {
            tracing::warn!(error = %e, emote_id = %id, "Failed to remove scratch workspace");
        }

        Ok(emote)
    }

    /// Transcode every planned tier concurrently. All workers are joined before returning.
    async fn transcode_all(
        &self,
        original: &Path,
        plan: &[PlannedRendition],
    ) -> Result<Vec<EncodedRendition>, TranscodeError> {
        let mut tasks = Vec::with_capacity(plan.len());
        for rendition in plan.iter().copied() {
            let transcoder = Arc::clone(&self.deps.transcoder);
            let input = original.to_path_buf();
            let task =
                tokio::spawn(async move { transcoder.transcode(&input, &rendition).await });
            tasks.push((rendition.tier.id, task));
        }

        let mut encoded = Vec::with_capacity(tasks.len());
        let mut first_error = None;
        for (tier, task) in tasks {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(TranscodeError::Failed {
                    tier,
                    status: "task aborted".to_string(),
                    stderr: e.to_string(),
                }),
            };
            match result {
                Ok(data) => encoded.push(EncodedRendition { tier, data }),
                Err(e) => {
                    tracing::error!(tier, error = %e, "Rendition transcode failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(encoded),
        }
    }

    /// Compensating delete of a just-inserted record.
    async fn compensate(&self, id: Uuid) {
        match self.deps.emotes.delete(id).await {
            Ok(_) => tracing::warn!(emote_id = %id, "Rolled back emote record"),
            Err(e) => {
                tracing::error!(error = %e, emote_id = %id, "Compensating delete failed")
            }
        }
    }

    /// Flip an emote to Deleted, then purge its renditions and references.
    ///
    /// Success depends only on the state flip; the purge outcome is logged.
    #[tracing::instrument(skip(self, actor, reason), fields(actor_id = %actor.id))]
    pub async fn delete(
        &self,
        actor: &Actor,
        emote_id: &str,
        reason: &str,
    ) -> Result<DeletedEmote, AppError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::InvalidInput(
                "A reason for deletion is required".to_string(),
            ));
        }

        let id = parse_id(emote_id, "Unknown Emote")?;
        let emote = self
            .deps
            .emotes
            .find(id)
            .await?
            .filter(|e| !e.status.is_terminal())
            .ok_or_else(|| AppError::NotFound("Unknown Emote".to_string()))?;

        if !self.deps.authorizer.may_delete(actor, &emote).await? {
            return Err(AppError::Forbidden("Access Denied".to_string()));
        }

        let deleted_at = Utc::now();
        if !self.deps.emotes.mark_deleted(id, deleted_at).await? {
            // A concurrent delete won the conditional update and owns the purge
            return Err(AppError::NotFound("Unknown Emote".to_string()));
        }

        tracing::info!(emote_id = %id, reason = %reason, "Emote deleted");

        record_audit(
            self.deps.audit.as_ref(),
            AuditLog {
                kind: AuditLogKind::EmoteDelete,
                actor_id: actor.id,
                target: AuditTarget::emote(id),
                changes: vec![AuditChange::new(
                    "status",
                    emote.status,
                    EmoteStatus::Deleted,
                )],
                reason: Some(reason.to_string()),
            },
        )
        .await;

        let purge = self.purger.purge(id).await;
        if purge.is_complete() {
            tracing::info!(
                emote_id = %id,
                purged = ?purge.purged,
                consumers = purge.consumers_updated.unwrap_or_default(),
                "Emote purged"
            );
        } else {
            tracing::error!(
                emote_id = %id,
                purged = ?purge.purged,
                failed = ?purge.failed,
                consumers = ?purge.consumers_updated,
                "Emote purge incomplete"
            );
        }

        let mut emote = emote;
        emote.status = EmoteStatus::Deleted;
        emote.last_modified = deleted_at;

        publish_event(
            self.deps.events.as_ref(),
            EmoteEvent::Deleted {
                emote: emote.clone(),
                actor: actor.clone(),
                reason: reason.to_string(),
            },
        )
        .await;

        Ok(DeletedEmote { emote, purge })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorizer::PermissionAuthorizer;
    use crate::testing::{FailingStorage, FakeTranscoder, NilIdEmoteStore, RecordingEventSink};
    use emotia_core::models::{Channel, Permission};
    use emotia_db::{InMemoryAuditSink, InMemoryChannelStore, InMemoryEmoteStore};
    use emotia_storage::{rendition_key, MemoryStorage};
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Harness {
        root: TempDir,
        emotes: InMemoryEmoteStore,
        channels: InMemoryChannelStore,
        storage: MemoryStorage,
        audit: InMemoryAuditSink,
        events: RecordingEventSink,
        transcoder: FakeTranscoder,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                root: tempfile::tempdir().unwrap(),
                emotes: InMemoryEmoteStore::new(),
                channels: InMemoryChannelStore::new(),
                storage: MemoryStorage::new(),
                audit: InMemoryAuditSink::new(),
                events: RecordingEventSink::default(),
                transcoder: FakeTranscoder::new(),
            }
        }

        fn deps(&self) -> Collaborators {
            let channels: Arc<dyn ChannelStore> = Arc::new(self.channels.clone());
            Collaborators {
                emotes: Arc::new(self.emotes.clone()),
                channels: Arc::clone(&channels),
                storage: Arc::new(self.storage.clone()),
                transcoder: Arc::new(self.transcoder.clone()),
                authorizer: Arc::new(PermissionAuthorizer::new(channels)),
                audit: Arc::new(self.audit.clone()),
                events: Arc::new(self.events.clone()),
            }
        }

        fn lifecycle_with(&self, deps: Collaborators) -> EmoteLifecycle {
            let settings = LifecycleSettings {
                bucket: "emotes".to_string(),
                max_frames: 1024,
                purge_retry_attempts: 2,
            };
            let purger = PurgeOrchestrator::new(
                Arc::clone(&deps.storage),
                Arc::clone(&deps.channels),
                "emotes",
                vec![1, 2, 3, 4],
                2,
            )
            .with_backoff(Duration::from_millis(1));
            EmoteLifecycle::new(deps, settings).with_purger(purger)
        }

        fn lifecycle(&self) -> EmoteLifecycle {
            self.lifecycle_with(self.deps())
        }

        async fn request(&self, data: &[u8], format: SourceFormat) -> IngestRequest {
            let workspace = ScratchWorkspace::create(self.root.path()).await.unwrap();
            workspace.write_original(data).await.unwrap();
            IngestRequest {
                name: Some("pepeD".to_string()),
                channel_id: None,
                file_name: None,
                format,
                workspace,
            }
        }

        fn workspace_count(&self) -> usize {
            std::fs::read_dir(self.root.path()).unwrap().count()
        }
    }

    fn uploader() -> Actor {
        Actor::new(Uuid::new_v4(), "forsen", vec![Permission::EmoteCreate])
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    fn gif_with_frames(count: usize) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut out);
            for _ in 0..count {
                let frame = Frame::from_parts(
                    RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255])),
                    0,
                    0,
                    Delay::from_numer_denom_ms(10, 1),
                );
                encoder.encode_frame(frame).unwrap();
            }
        }
        out
    }

    async fn live_emote(h: &Harness, actor: &Actor) -> Emote {
        let request = h.request(&png(400, 100), SourceFormat::Png).await;
        h.lifecycle().ingest(actor, request).await.unwrap()
    }

    #[tokio::test]
    async fn test_ingest_publishes_every_tier_and_goes_live() {
        let h = Harness::new();
        let actor = uploader();

        let emote = live_emote(&h, &actor).await;

        assert_eq!(emote.status, EmoteStatus::Live);
        assert_eq!(emote.owner_id, actor.id);
        assert_eq!(emote.width, [96, 192, 288, 384]);
        assert_eq!(emote.height, [24, 48, 72, 96]);
        assert!(emote.visibility.private && emote.visibility.hidden);
        assert_eq!(emote.mime, "image/webp");

        let stored = h.emotes.get(emote.id).await.unwrap();
        assert_eq!(stored.status, EmoteStatus::Live);

        for tier in 1..=4u8 {
            let object = h
                .storage
                .object("emotes", &rendition_key(emote.id, tier))
                .await
                .unwrap();
            assert!(object.data.starts_with(format!("{}:", tier).as_bytes()));
        }

        let audit = h.audit.entries().await;
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].kind, AuditLogKind::EmoteCreate);
        assert_eq!(audit[0].changes.len(), 6);
        assert!(matches!(h.events.events()[0], EmoteEvent::Created { .. }));
        assert_eq!(h.workspace_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_failure_removes_record() {
        let h = Harness::new();
        let mut deps = h.deps();
        deps.storage = Arc::new(FailingStorage::new(h.storage.clone()).fail_put_tier(3));
        let lifecycle = h.lifecycle_with(deps);

        let request = h.request(&png(64, 64), SourceFormat::Png).await;
        let err = lifecycle.ingest(&uploader(), request).await.unwrap_err();

        assert!(matches!(err, AppError::Upload(_)));
        assert!(h.emotes.is_empty().await);
        assert!(h.audit.entries().await.is_empty());
        assert!(h.events.events().is_empty());
        assert_eq!(h.workspace_count(), 0);
    }

    #[tokio::test]
    async fn test_transcode_failure_creates_nothing() {
        let mut h = Harness::new();
        h.transcoder = FakeTranscoder::failing_on(2);
        let lifecycle = h.lifecycle();

        let request = h.request(&png(64, 64), SourceFormat::Png).await;
        let err = lifecycle.ingest(&uploader(), request).await.unwrap_err();

        assert!(matches!(err, AppError::Transcode(_)));
        assert!(h.emotes.is_empty().await);
        assert!(h.storage.keys("emotes").await.is_empty());
        assert_eq!(h.workspace_count(), 0);
    }

    #[tokio::test]
    async fn test_too_many_frames_rejected_before_transcoding() {
        let h = Harness::new();
        let lifecycle = h.lifecycle();

        let request = h.request(&gif_with_frames(1025), SourceFormat::Gif).await;
        let err = lifecycle.ingest(&uploader(), request).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(h.transcoder.calls(), 0);
        assert!(h.emotes.is_empty().await);
    }

    #[tokio::test]
    async fn test_malformed_identity_is_rolled_back() {
        let h = Harness::new();
        let store = NilIdEmoteStore::default();
        let mut deps = h.deps();
        deps.emotes = Arc::new(store.clone());
        let lifecycle = h.lifecycle_with(deps);

        let request = h.request(&png(32, 32), SourceFormat::Png).await;
        let err = lifecycle.ingest(&uploader(), request).await.unwrap_err();

        assert!(matches!(err, AppError::RecordInconsistency(_)));
        assert_eq!(store.deleted(), vec![Uuid::nil()]);
        assert!(h.storage.keys("emotes").await.is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_permission() {
        let h = Harness::new();
        let actor = Actor::new(Uuid::new_v4(), "nobody", vec![]);

        let request = h.request(&png(32, 32), SourceFormat::Png).await;
        let err = h.lifecycle().ingest(&actor, request).await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(h.transcoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_for_other_channel_requires_editor() {
        let h = Harness::new();
        let actor = uploader();
        let channel_id = Uuid::new_v4();

        let mut request = h.request(&png(32, 32), SourceFormat::Png).await;
        request.channel_id = Some(channel_id);
        let err = h.lifecycle().ingest(&actor, request).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        h.channels
            .put(Channel {
                id: channel_id,
                display_name: "xqc".to_string(),
                emotes: vec![],
                editors: vec![actor.id],
            })
            .await;
        let mut request = h.request(&png(32, 32), SourceFormat::Png).await;
        request.channel_id = Some(channel_id);
        let emote = h.lifecycle().ingest(&actor, request).await.unwrap();
        assert_eq!(emote.owner_id, channel_id);
    }

    #[tokio::test]
    async fn test_name_inferred_from_file_name() {
        let h = Harness::new();
        let mut request = h.request(&png(32, 32), SourceFormat::Png).await;
        request.name = None;
        request.file_name = Some("monkaS.png".to_string());

        let emote = h.lifecycle().ingest(&uploader(), request).await.unwrap();
        assert_eq!(emote.name, "monkaS");
    }

    #[tokio::test]
    async fn test_missing_name_is_validation_error() {
        let h = Harness::new();
        let mut request = h.request(&png(32, 32), SourceFormat::Png).await;
        request.name = None;

        let err = h.lifecycle().ingest(&uploader(), request).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(h.workspace_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_flips_state_and_purges() {
        let h = Harness::new();
        let actor = uploader();
        let emote = live_emote(&h, &actor).await;
        h.channels
            .put(Channel {
                id: Uuid::new_v4(),
                display_name: "forsen".to_string(),
                emotes: vec![emote.id],
                editors: vec![],
            })
            .await;

        let deleted = h
            .lifecycle()
            .delete(&actor, &emote.id.to_string(), "duplicate")
            .await
            .unwrap();

        assert_eq!(deleted.emote.status, EmoteStatus::Deleted);
        assert_eq!(deleted.purge.purged, vec![1, 2, 3, 4]);
        assert_eq!(deleted.purge.consumers_updated, Some(1));
        assert_eq!(
            h.emotes.get(emote.id).await.unwrap().status,
            EmoteStatus::Deleted
        );
        assert!(h.storage.keys("emotes").await.is_empty());

        let audit = h.audit.entries().await;
        let entry = audit.last().unwrap();
        assert_eq!(entry.kind, AuditLogKind::EmoteDelete);
        assert_eq!(entry.reason.as_deref(), Some("duplicate"));
        assert!(matches!(
            h.events.events().last(),
            Some(EmoteEvent::Deleted { .. })
        ));
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found_without_purge() {
        let h = Harness::new();
        let actor = uploader();
        let emote = live_emote(&h, &actor).await;

        let storage = FailingStorage::new(h.storage.clone());
        let mut deps = h.deps();
        deps.storage = Arc::new(storage.clone());
        let lifecycle = h.lifecycle_with(deps);

        lifecycle
            .delete(&actor, &emote.id.to_string(), "first")
            .await
            .unwrap();
        let err = lifecycle
            .delete(&actor, &emote.id.to_string(), "second")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(storage.expire_calls(), 4);
    }

    #[tokio::test]
    async fn test_purge_failure_does_not_fail_delete() {
        let h = Harness::new();
        let actor = uploader();
        let emote = live_emote(&h, &actor).await;

        let mut deps = h.deps();
        deps.storage = Arc::new(FailingStorage::new(h.storage.clone()).fail_expire_tier(3));
        let lifecycle = h.lifecycle_with(deps);

        let deleted = lifecycle
            .delete(&actor, &emote.id.to_string(), "cleanup")
            .await
            .unwrap();

        assert_eq!(deleted.purge.purged, vec![1, 2, 4]);
        assert_eq!(deleted.purge.failed, vec![3]);
        assert_eq!(
            h.emotes.get(emote.id).await.unwrap().status,
            EmoteStatus::Deleted
        );
        assert_eq!(
            h.storage.keys("emotes").await,
            vec![rendition_key(emote.id, 3)]
        );
    }

    #[tokio::test]
    async fn test_delete_input_checks() {
        let h = Harness::new();
        let actor = uploader();
        let emote = live_emote(&h, &actor).await;
        let lifecycle = h.lifecycle();

        let err = lifecycle
            .delete(&actor, &emote.id.to_string(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = lifecycle.delete(&actor, "zzz", "reason").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = lifecycle
            .delete(&actor, &Uuid::new_v4().to_string(), "reason")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let stranger = Actor::new(Uuid::new_v4(), "stranger", vec![]);
        let err = lifecycle
            .delete(&stranger, &emote.id.to_string(), "reason")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(
            h.emotes.get(emote.id).await.unwrap().status,
            EmoteStatus::Live
        );
    }
}
