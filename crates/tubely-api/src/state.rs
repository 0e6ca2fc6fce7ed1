//! Application state shared by all handlers.

use std::sync::Arc;

use anyhow::Result;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{
    FfmpegRemuxer, FfprobeProbe, PipelineSettings, Remuxer, ThumbnailPublisher, VideoProbe,
    VideoPublishPipeline,
};
use tubely_storage::Storage;

use crate::auth::JwtAuthenticator;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub repository: Arc<dyn VideoRepository>,
    pub videos: VideoPublishPipeline,
    pub thumbnails: ThumbnailPublisher,
    pub authenticator: Arc<JwtAuthenticator>,
}

impl AppState {
    /// Build state with the ffprobe/ffmpeg wrappers named by the configuration.
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        repository: Arc<dyn VideoRepository>,
    ) -> Result<Self> {
        let probe = FfprobeProbe::new(config.ffprobe_path(), config.media_tool_timeout())?;
        let remuxer = FfmpegRemuxer::new(config.ffmpeg_path(), config.media_tool_timeout())?;
        Ok(Self::with_media_tools(
            config,
            storage,
            repository,
            Arc::new(probe),
            Arc::new(remuxer),
        ))
    }

    pub fn with_media_tools(
        config: Config,
        storage: Arc<dyn Storage>,
        repository: Arc<dyn VideoRepository>,
        probe: Arc<dyn VideoProbe>,
        remuxer: Arc<dyn Remuxer>,
    ) -> Self {
        let videos = VideoPublishPipeline::new(
            storage.clone(),
            repository.clone(),
            probe,
            remuxer,
            PipelineSettings::from_config(&config),
        );
        let thumbnails = ThumbnailPublisher::new(
            storage.clone(),
            repository.clone(),
            config.max_thumbnail_size_bytes(),
            config.delete_orphaned_uploads(),
        );
        let authenticator = Arc::new(JwtAuthenticator::new(config.jwt_secret()));

        Self {
            config,
            storage,
            repository,
            videos,
            thumbnails,
            authenticator,
        }
    }
}
