//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Random source failure: {0}")]
    Entropy(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            StorageError::Entropy(msg) => AppError::Entropy(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Size and declared content type of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub size: u64,
    pub content_type: Option<String>,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem, memory) implement this trait so
/// the publish pipeline works with any of them without coupling to
/// implementation details. Keys are produced by [`crate::keys`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload an in-memory payload under `storage_key` and return its public URL.
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String>;

    /// Upload a file from a stream/reader (for large files)
    ///
    /// The reader is consumed until EOF without being buffered in memory as a
    /// whole. A single put is performed; a failed upload is aborted and never
    /// retried.
    ///
    /// # Arguments
    /// * `storage_key` - Object key to publish under
    /// * `content_type` - MIME type recorded with the object
    /// * `content_length` - Expected size of the content, if known
    /// * `reader` - Async reader that provides the file content
    ///
    /// # Returns
    /// The public URL of the object
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Size and content type of a stored object
    async fn object_info(&self, storage_key: &str) -> StorageResult<ObjectInfo>;

    /// Delete a file by its storage key
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Public URL under which `storage_key` is served
    fn public_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Reject keys that could escape a storage root or address a bucket root.
pub(crate) fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorMetadata;

    #[test]
    fn test_storage_errors_map_to_app_errors() {
        let err: AppError = StorageError::UploadFailed("connection reset".into()).into();
        assert_eq!(err.http_status_code(), 502);

        let err: AppError = StorageError::NotFound("landscape/x.mp4".into()).into();
        assert_eq!(err.http_status_code(), 404);

        let err: AppError = StorageError::Entropy("getrandom failed".into()).into();
        assert_eq!(err.error_code(), "ENTROPY_ERROR");
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("landscape/abc.mp4").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("landscape/../../x").is_err());
    }
}
