//! Thumbnail publishing. Images are small, so they are buffered in memory and
//! stored as-is without touching disk or external tools.

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};
use uuid::Uuid;

use tubely_core::constants::{THUMBNAIL_CONTENT_TYPES, THUMBNAIL_KEY_PREFIX};
use tubely_core::{AppError, Video};
use tubely_db::{MediaSlot, VideoRepository};
use tubely_storage::{generate_object_key, Storage};

use super::pipeline::{load_owned_video, record_or_compensate};
use super::types::IncomingUpload;
use crate::error::MediaError;
use crate::validator::MediaValidator;

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        _ => "jpeg",
    }
}

pub struct ThumbnailPublisher {
    storage: Arc<dyn Storage>,
    repository: Arc<dyn VideoRepository>,
    validator: MediaValidator,
    delete_orphaned_uploads: bool,
}

impl ThumbnailPublisher {
    pub fn new(
        storage: Arc<dyn Storage>,
        repository: Arc<dyn VideoRepository>,
        max_size_bytes: u64,
        delete_orphaned_uploads: bool,
    ) -> Self {
        Self {
            storage,
            repository,
            validator: MediaValidator::new(
                max_size_bytes,
                THUMBNAIL_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
            ),
            delete_orphaned_uploads,
        }
    }

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
        load_owned_video(self.repository.as_ref(), video_id, owner_id).await?;

        let content_type = self.validator.validate_content_type(&upload.content_type)?;
        if let Some(declared) = upload.declared_size {
            self.validator.validate_file_size(declared)?;
        }

        let mut data = Vec::new();
        upload
            .reader
            .take(self.validator.max_file_size().saturating_add(1))
            .read_to_end(&mut data)
            .await
            .map_err(MediaError::Io)?;
        self.validator.validate_file_size(data.len() as u64)?;

        let key = generate_object_key(THUMBNAIL_KEY_PREFIX, extension_for(&content_type))?;
        let size = data.len();
        let url = self
            .storage
            .upload(&key, &content_type, Bytes::from(data))
            .await?;

        let updated = record_or_compensate(
            self.storage.as_ref(),
            self.repository.as_ref(),
            video_id,
            MediaSlot::Thumbnail,
            url,
            &key,
            self.delete_orphaned_uploads,
        )
        .await?;

        tracing::info!(key = %key, size_bytes = size, content_type = %content_type, "Thumbnail published");
        Ok(updated)
    }
}
