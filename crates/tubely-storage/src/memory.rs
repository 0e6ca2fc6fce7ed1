use crate::object;
use crate::traits::{validate_key, ObjectInfo, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::ObjectStore;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// In-process storage backed by `object_store`'s `InMemory` store.
///
/// Objects live as long as the process. Used for development and tests.
#[derive(Clone)]
pub struct MemoryStorage {
    store: Arc<dyn ObjectStore>,
    base_url: String,
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        MemoryStorage {
            store: Arc::new(InMemory::new()),
            base_url: base_url.into(),
        }
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        let size = data.len();

        object::put_bytes(&self.store, storage_key, content_type, data)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::debug!(
            key = %storage_key,
            size_bytes = size,
            "Memory storage upload successful"
        );

        Ok(self.generate_url(storage_key))
    }

    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        _content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        let size = object::put_stream(&self.store, storage_key, content_type, reader).await?;

        tracing::debug!(
            key = %storage_key,
            size_bytes = size,
            "Memory storage stream upload successful"
        );

        Ok(self.generate_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        validate_key(storage_key)?;
        Ok(object::get_bytes(&self.store, storage_key).await?.to_vec())
    }

    async fn object_info(&self, storage_key: &str) -> StorageResult<ObjectInfo> {
        validate_key(storage_key)?;
        object::info(&self.store, storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;
        object::delete(&self.store, storage_key)
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        object::exists(&self.store, storage_key).await
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.generate_url(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_download() {
        let storage = MemoryStorage::new("memory://tubely/");
        let url = storage
            .upload("thumbnails/a.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();

        assert_eq!(url, "memory://tubely/thumbnails/a.png");
        assert_eq!(storage.download("thumbnails/a.png").await.unwrap(), b"png");
    }

    #[tokio::test]
    async fn test_stream_upload_records_content_type() {
        let storage = MemoryStorage::new("memory://tubely");
        let data = b"stream test data".to_vec();
        let reader = Box::pin(std::io::Cursor::new(data.clone()))
            as Pin<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;

        storage
            .upload_stream("landscape/x.mp4", "video/mp4", Some(data.len() as u64), reader)
            .await
            .unwrap();

        let info = storage.object_info("landscape/x.mp4").await.unwrap();
        assert_eq!(info.size, data.len() as u64);
        assert_eq!(info.content_type.as_deref(), Some("video/mp4"));
        assert_eq!(storage.download("landscape/x.mp4").await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_delete_and_exists() {
        let storage = MemoryStorage::new("memory://tubely");
        storage
            .upload("other/y.mp4", "video/mp4", Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert!(storage.exists("other/y.mp4").await.unwrap());

        storage.delete("other/y.mp4").await.unwrap();
        assert!(!storage.exists("other/y.mp4").await.unwrap());

        // deleting again is not an error
        storage.delete("other/y.mp4").await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_object() {
        let storage = MemoryStorage::new("memory://tubely");
        let result = storage.download("other/missing.mp4").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let storage = MemoryStorage::new("memory://tubely");
        let result = storage
            .upload("/abs.mp4", "video/mp4", Bytes::from_static(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
