//! Stream introspection with ffprobe.

use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use super::tool;
use crate::error::MediaError;

/// Pixel dimensions of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Reads the primary video stream's dimensions from a media file.
#[async_trait]
pub trait VideoProbe: Send + Sync {
    async fn dimensions(&self, path: &Path) -> Result<Dimensions, MediaError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

/// Parse `ffprobe -print_format json -show_streams` output and select the
/// first stream that carries both width and height.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Dimensions, MediaError> {
    let output: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| MediaError::Parse(e.to_string()))?;

    output
        .streams
        .iter()
        .find_map(|s| match (s.width, s.height) {
            (Some(width), Some(height)) => Some(Dimensions { width, height }),
            _ => None,
        })
        .ok_or(MediaError::NoVideoStream)
}

pub struct FfprobeProbe {
    ffprobe_path: String,
    timeout: Duration,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Result<Self, MediaError> {
        let ffprobe_path = ffprobe_path.into();
        tool::validate_tool_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }
}

#[async_trait]
impl VideoProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn dimensions(&self, path: &Path) -> Result<Dimensions, MediaError> {
        let start = std::time::Instant::now();

        let args: Vec<OsString> = vec![
            "-v".into(),
            "error".into(),
            "-print_format".into(),
            "json".into(),
            "-show_streams".into(),
            path.as_os_str().to_os_string(),
        ];
        let output = tool::run("ffprobe", &self.ffprobe_path, args, self.timeout).await?;
        let dimensions = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            width = dimensions.width,
            height = dimensions.height,
            "Video probe completed"
        );

        Ok(dimensions)
    }
}
