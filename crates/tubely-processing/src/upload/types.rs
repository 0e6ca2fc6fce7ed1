//! Types for the upload pipelines.

use std::fmt::{Display, Formatter, Result as FmtResult};
use tokio::io::AsyncRead;

/// One uploaded multipart field, not yet read.
pub struct IncomingUpload<R> {
    /// Content type declared by the client for the field.
    pub content_type: String,
    /// Size announced by the client, if any. Never trusted as the real size.
    pub declared_size: Option<u64>,
    pub reader: R,
}

impl<R: AsyncRead + Unpin + Send> IncomingUpload<R> {
    pub fn new(content_type: impl Into<String>, declared_size: Option<u64>, reader: R) -> Self {
        Self {
            content_type: content_type.into(),
            declared_size,
            reader,
        }
    }
}

/// Progress of a video upload; logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Authenticated,
    Authorized,
    Ingested,
    Processed,
    Classified,
    Keyed,
    Published,
    Recorded,
}

impl Display for UploadStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            UploadStage::Authenticated => "authenticated",
            UploadStage::Authorized => "authorized",
            UploadStage::Ingested => "ingested",
            UploadStage::Processed => "processed",
            UploadStage::Classified => "classified",
            UploadStage::Keyed => "keyed",
            UploadStage::Published => "published",
            UploadStage::Recorded => "recorded",
        };
        f.write_str(s)
    }
}
