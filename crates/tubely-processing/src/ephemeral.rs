//! Request-scoped temporary files.
//!
//! Every file created here is owned by an [`EphemeralFile`] whose drop removes
//! exactly the generated path, so cleanup happens on every exit path of the
//! request, including early returns, errors and cancelled futures.

use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::error::MediaError;

const UPLOAD_PREFIX: &str = "tubely-upload-";
const UPLOAD_SUFFIX: &str = ".mp4";

/// A file on local disk that is deleted when dropped.
#[derive(Debug)]
pub struct EphemeralFile {
    path: TempPath,
}

impl EphemeralFile {
    /// Take ownership of `path`, which may not exist yet.
    ///
    /// Used for tool outputs: the guard is armed before the tool runs so a
    /// partially written file is removed as well.
    pub fn adopt(path: PathBuf) -> std::io::Result<Self> {
        Ok(Self {
            path: TempPath::try_from_path(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file for reading from the start.
    pub async fn open(&self) -> std::io::Result<tokio::fs::File> {
        tokio::fs::File::open(&self.path).await
    }

    pub async fn len(&self) -> std::io::Result<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }
}

/// Spills incoming byte streams to uniquely named files under one directory.
#[derive(Debug, Clone)]
pub struct EphemeralStore {
    dir: PathBuf,
    max_bytes: u64,
}

impl EphemeralStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    /// Write `reader` to a fresh temporary file.
    ///
    /// A `declared_size` above the limit fails before any file is created.
    /// A stream that turns out longer than the limit fails after at most
    /// `max_bytes + 1` bytes were read, and its file is removed.
    pub async fn ingest<R>(
        &self,
        reader: R,
        declared_size: Option<u64>,
    ) -> Result<EphemeralFile, MediaError>
    where
        R: AsyncRead + Unpin,
    {
        if let Some(declared) = declared_size {
            if declared > self.max_bytes {
                return Err(MediaError::SizeExceeded {
                    limit: self.max_bytes,
                });
            }
        }

        let start = std::time::Instant::now();
        let dir = self.dir.clone();
        let named = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(UPLOAD_PREFIX)
                .suffix(UPLOAD_SUFFIX)
                .tempfile_in(dir)
        })
        .await
        .map_err(std::io::Error::other)??;

        let (file, path) = named.into_parts();
        let ingested = EphemeralFile { path };
        let mut file = tokio::fs::File::from_std(file);

        let mut limited = reader.take(self.max_bytes + 1);
        let written = tokio::io::copy(&mut limited, &mut file).await?;
        if written > self.max_bytes {
            tracing::debug!(
                path = %ingested.path().display(),
                limit = self.max_bytes,
                "Upload stream exceeded limit"
            );
            return Err(MediaError::SizeExceeded {
                limit: self.max_bytes,
            });
        }

        file.flush().await?;
        file.sync_data().await?;
        drop(file);

        tracing::debug!(
            path = %ingested.path().display(),
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload spilled to ephemeral file"
        );

        Ok(ingested)
    }
}
