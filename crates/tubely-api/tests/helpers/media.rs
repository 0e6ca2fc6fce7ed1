//! In-process stand-ins for ffprobe and ffmpeg.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tubely_processing::video::remux_output_path;
use tubely_processing::{Dimensions, EphemeralFile, MediaError, Remuxer, VideoProbe};

/// Reports fixed dimensions, or fails like ffprobe on a corrupt file.
pub struct FakeProbe {
    dimensions: Option<Dimensions>,
    calls: AtomicUsize,
}

impl FakeProbe {
    pub fn reporting(width: u32, height: u32) -> Self {
        Self {
            dimensions: Some(Dimensions { width, height }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            dimensions: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoProbe for FakeProbe {
    async fn dimensions(&self, _path: &Path) -> Result<Dimensions, MediaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dimensions.ok_or_else(|| MediaError::ToolFailed {
            tool: "ffprobe",
            message: "Invalid data found when processing input".to_string(),
        })
    }
}

/// Copies the source to the remux output path unchanged.
#[derive(Default)]
pub struct FakeRemuxer {
    calls: AtomicUsize,
}

impl FakeRemuxer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Remuxer for FakeRemuxer {
    async fn remux(&self, source: &Path) -> Result<EphemeralFile, MediaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let output = EphemeralFile::adopt(remux_output_path(source))?;
        tokio::fs::copy(source, output.path()).await?;
        Ok(output)
    }
}
