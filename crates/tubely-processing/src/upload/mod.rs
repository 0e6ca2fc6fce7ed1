//! Upload pipelines: publish a video, publish a thumbnail.

pub mod pipeline;
pub mod thumbnail;
pub mod types;

pub use pipeline::{PipelineSettings, VideoPublishPipeline};
pub use thumbnail::ThumbnailPublisher;
pub use types::{IncomingUpload, UploadStage};
