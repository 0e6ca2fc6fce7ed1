//! Video record repository.

use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

/// Which published asset URL of a record to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    Video,
    Thumbnail,
}

impl std::fmt::Display for MediaSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaSlot::Video => write!(f, "video"),
            MediaSlot::Thumbnail => write!(f, "thumbnail"),
        }
    }
}

/// Lookup and update of owner-tagged video records.
#[async_trait::async_trait]
pub trait VideoRepository: Send + Sync {
    /// Insert a new record and return it.
    async fn create_video(&self, video: Video) -> Result<Video, AppError>;

    /// Fetch a record by id. `Ok(None)` when it does not exist.
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Set one asset URL on an existing record and return the record as
    /// stored. Other fields, including the other URL, are left as they are.
    async fn set_media_url(
        &self,
        id: Uuid,
        slot: MediaSlot,
        url: String,
    ) -> Result<Video, AppError>;
}

/// Process-local repository guarded by an async `RwLock`.
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<HashMap<Uuid, Video>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VideoRepository for InMemoryVideoRepository {
    #[tracing::instrument(skip(self, video), fields(video.id = %video.id))]
    async fn create_video(&self, video: Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(AppError::BadRequest(format!(
                "Video {} already exists",
                video.id
            )));
        }
        videos.insert(video.id, video.clone());
        Ok(video)
    }

    #[tracing::instrument(skip(self))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    #[tracing::instrument(skip(self, url))]
    async fn set_media_url(
        &self,
        id: Uuid,
        slot: MediaSlot,
        url: String,
    ) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        match slot {
            MediaSlot::Video => stored.video_url = Some(url),
            MediaSlot::Thumbnail => stored.thumbnail_url = Some(url),
        }
        stored.updated_at = Utc::now();

        tracing::debug!(video_id = %id, slot = %slot, "Video record updated");
        Ok(stored.clone())
    }
}
