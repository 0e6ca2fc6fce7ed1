//! Video publish pipeline: authorize → ingest → remux + probe → classify → key → publish → record.
//!
//! Each call owns its ephemeral files for the duration of the request. They
//! are held by [`EphemeralFile`] guards, so every exit path (validation
//! failure, tool failure, storage failure, persistence failure, success, or a
//! dropped request future) removes them.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::AsyncRead;
use uuid::Uuid;

use tubely_core::constants::{VIDEO_CONTENT_TYPE, VIDEO_EXTENSION};
use tubely_core::{AppError, Config, Video};
use tubely_db::{MediaSlot, VideoRepository};
use tubely_storage::{generate_object_key, Storage};

use super::types::{IncomingUpload, UploadStage};
use crate::ephemeral::{EphemeralFile, EphemeralStore};
use crate::validator::MediaValidator;
use crate::video::{classify, Remuxer, VideoProbe};

/// Tunables for [`VideoPublishPipeline`].
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub temp_dir: PathBuf,
    pub max_video_size_bytes: u64,
    pub aspect_ratio_tolerance: f64,
    pub delete_orphaned_uploads: bool,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            temp_dir: config.upload_temp_dir(),
            max_video_size_bytes: config.max_video_size_bytes(),
            aspect_ratio_tolerance: config.aspect_ratio_tolerance(),
            delete_orphaned_uploads: config.delete_orphaned_uploads(),
        }
    }
}

/// Load a record and check that `owner_id` owns it.
///
/// A missing record is `NotFound`; someone else's record is `Unauthorized`.
pub(crate) async fn load_owned_video(
    repository: &dyn VideoRepository,
    video_id: Uuid,
    owner_id: Uuid,
) -> Result<Video, AppError> {
    let video = repository
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if !video.is_owned_by(owner_id) {
        tracing::warn!(
            video_id = %video_id,
            user_id = %owner_id,
            "Rejected upload from non-owner"
        );
        return Err(AppError::Unauthorized(
            "You are not the owner of this video".to_string(),
        ));
    }

    Ok(video)
}

/// Record `url` in `slot` of the record; if that fails, try to delete the
/// object just published under `key` so it does not linger unreferenced.
///
/// Only the one URL is written, so concurrent uploads of the other asset on
/// the same record are preserved.
pub(crate) async fn record_or_compensate(
    storage: &dyn Storage,
    repository: &dyn VideoRepository,
    video_id: Uuid,
    slot: MediaSlot,
    url: String,
    key: &str,
    delete_orphaned_uploads: bool,
) -> Result<Video, AppError> {
    match repository.set_media_url(video_id, slot, url).await {
        Ok(updated) => Ok(updated),
        Err(e) => {
            tracing::error!(
                error = %e,
                video_id = %video_id,
                slot = %slot,
                key = %key,
                "Failed to record published object"
            );
            if delete_orphaned_uploads {
                if let Err(delete_err) = storage.delete(key).await {
                    tracing::warn!(
                        error = %delete_err,
                        key = %key,
                        "Failed to delete orphaned object"
                    );
                }
            }
            Err(AppError::Persistence(e.to_string()))
        }
    }
}

pub struct VideoPublishPipeline {
    storage: Arc<dyn Storage>,
    repository: Arc<dyn VideoRepository>,
    probe: Arc<dyn VideoProbe>,
    remuxer: Arc<dyn Remuxer>,
    validator: MediaValidator,
    ephemeral: EphemeralStore,
    settings: PipelineSettings,
}

impl VideoPublishPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        repository: Arc<dyn VideoRepository>,
        probe: Arc<dyn VideoProbe>,
        remuxer: Arc<dyn Remuxer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            storage,
            repository,
            probe,
            remuxer,
            validator: MediaValidator::new(
                settings.max_video_size_bytes,
                vec![VIDEO_CONTENT_TYPE.to_string()],
            ),
            ephemeral: EphemeralStore::new(
                settings.temp_dir.clone(),
                settings.max_video_size_bytes,
            ),
            settings,
        }
    }

    /// Publish the uploaded video for `video_id` on behalf of `owner_id` and
    /// return the updated record.
    #[tracing::instrument(skip(self, upload), fields(video.id = %video_id, user.id = %owner_id))]
    pub async fn publish<R>(
        &self,
        video_id: Uuid,
        owner_id: Uuid,
        upload: IncomingUpload<R>,
    ) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let start = std::time::Instant::now();
        tracing::debug!(stage = %UploadStage::Authenticated, "Upload stage reached");

        load_owned_video(self.repository.as_ref(), video_id, owner_id).await?;
        tracing::debug!(stage = %UploadStage::Authorized, "Upload stage reached");

        self.validator.validate_content_type(&upload.content_type)?;

        let ingested = self
            .ephemeral
            .ingest(upload.reader, upload.declared_size)
            .await?;
        tracing::debug!(
            stage = %UploadStage::Ingested,
            path = %ingested.path().display(),
            "Upload stage reached"
        );

        // Both tools read the ingested file independently. They always run to
        // completion so no process outlives this call.
        let (remuxed, dimensions) = tokio::join!(
            self.remuxer.remux(ingested.path()),
            self.probe.dimensions(ingested.path())
        );
        let dimensions = dimensions?;
        let remuxed: EphemeralFile = remuxed?;
        tracing::debug!(
            stage = %UploadStage::Processed,
            width = dimensions.width,
            height = dimensions.height,
            "Upload stage reached"
        );

        let orientation = classify(
            dimensions.width,
            dimensions.height,
            self.settings.aspect_ratio_tolerance,
        );
        tracing::debug!(stage = %UploadStage::Classified, orientation = %orientation, "Upload stage reached");

        let key = generate_object_key(orientation.prefix(), VIDEO_EXTENSION)?;
        tracing::debug!(stage = %UploadStage::Keyed, key = %key, "Upload stage reached");

        let file = remuxed.open().await?;
        let size = file.metadata().await?.len();
        let url = self
            .storage
            .upload_stream(&key, VIDEO_CONTENT_TYPE, Some(size), Box::pin(file))
            .await?;
        tracing::debug!(stage = %UploadStage::Published, key = %key, "Upload stage reached");

        let updated = record_or_compensate(
            self.storage.as_ref(),
            self.repository.as_ref(),
            video_id,
            MediaSlot::Video,
            url,
            &key,
            self.settings.delete_orphaned_uploads,
        )
        .await?;

        tracing::info!(
            stage = %UploadStage::Recorded,
            key = %key,
            orientation = %orientation,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video published"
        );

        Ok(updated)
    }
}
