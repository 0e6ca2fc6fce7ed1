//! Fast-start remuxing with ffmpeg.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::tool;
use crate::ephemeral::EphemeralFile;
use crate::error::MediaError;

/// Rewrites a container so playback metadata precedes the payload.
#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Produce a new file next to `source`; `source` is left untouched.
    async fn remux(&self, source: &Path) -> Result<EphemeralFile, MediaError>;
}

/// `<dir>/<stem>.processing.mp4` for a source at `<dir>/<stem>.<ext>`.
pub fn remux_output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    source.with_file_name(format!("{}.processing.mp4", stem))
}

pub struct FfmpegRemuxer {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Result<Self, MediaError> {
        let ffmpeg_path = ffmpeg_path.into();
        tool::validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, source: &Path) -> Result<EphemeralFile, MediaError> {
        let start = std::time::Instant::now();

        // Armed before ffmpeg starts so partial output is removed on failure.
        let output = EphemeralFile::adopt(remux_output_path(source))?;

        let args: Vec<OsString> = vec![
            "-v".into(),
            "error".into(),
            "-i".into(),
            source.as_os_str().to_os_string(),
            "-c".into(),
            "copy".into(),
            "-movflags".into(),
            "+faststart".into(),
            "-f".into(),
            "mp4".into(),
            "-y".into(),
            output.path().as_os_str().to_os_string(),
        ];
        tool::run("ffmpeg", &self.ffmpeg_path, args, self.timeout).await?;

        let size = output.len().await.map_err(|e| MediaError::ToolFailed {
            tool: "ffmpeg",
            message: format!("no output at {}: {}", output.path().display(), e),
        })?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            size_bytes = size,
            output = %output.path().display(),
            "Fast-start remux completed"
        );

        Ok(output)
    }
}
