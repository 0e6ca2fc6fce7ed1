//! Tubely media processing
//!
//! The video publish pipeline and its stages: spilling uploads to ephemeral
//! files, probing dimensions with ffprobe, fast-start remuxing with ffmpeg,
//! orientation classification, and the thumbnail publisher.

pub mod ephemeral;
pub mod error;
pub mod upload;
pub mod validator;
pub mod video;

#[cfg(test)]
pub(crate) mod test_support;

pub use ephemeral::{EphemeralFile, EphemeralStore};
pub use error::MediaError;
pub use upload::{IncomingUpload, PipelineSettings, ThumbnailPublisher, UploadStage, VideoPublishPipeline};
pub use validator::{normalize_content_type, MediaValidator};
pub use video::{
    classify, Dimensions, FfmpegRemuxer, FfprobeProbe, Remuxer, VideoProbe,
};
