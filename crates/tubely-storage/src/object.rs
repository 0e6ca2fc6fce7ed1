//! Helpers shared by the `object_store` backed implementations (S3, memory).

use crate::traits::{ObjectInfo, StorageError, StorageResult};
use bytes::Bytes;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWriteExt};

fn content_type_attributes(content_type: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.to_string().into());
    attributes
}

pub(crate) async fn put_bytes(
    store: &Arc<dyn ObjectStore>,
    storage_key: &str,
    content_type: &str,
    data: Bytes,
) -> ObjectResult<()> {
    let location = Path::from(storage_key);
    let opts = PutOptions {
        attributes: content_type_attributes(content_type),
        ..Default::default()
    };
    store
        .put_opts(&location, PutPayload::from(data), opts)
        .await
        .map(|_| ())
}

/// Stream `reader` into a single object. Large bodies go through multipart
/// upload; a failed copy aborts it so no partial object is left behind.
pub(crate) async fn put_stream(
    store: &Arc<dyn ObjectStore>,
    storage_key: &str,
    content_type: &str,
    mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
) -> StorageResult<u64> {
    let location = Path::from(storage_key);
    let mut writer = BufWriter::new(Arc::clone(store), location)
        .with_attributes(content_type_attributes(content_type));

    let bytes_copied = match tokio::io::copy(&mut reader, &mut writer).await {
        Ok(n) => n,
        Err(e) => {
            if let Err(abort_err) = writer.abort().await {
                tracing::warn!(
                    error = %abort_err,
                    key = %storage_key,
                    "Failed to abort partial upload"
                );
            }
            return Err(StorageError::UploadFailed(format!(
                "Failed to stream object {}: {}",
                storage_key, e
            )));
        }
    };

    writer.shutdown().await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to complete object {}: {}", storage_key, e))
    })?;

    Ok(bytes_copied)
}

pub(crate) async fn get_bytes(store: &Arc<dyn ObjectStore>, storage_key: &str) -> StorageResult<Bytes> {
    let location = Path::from(storage_key);
    let result = store.get(&location).await.map_err(|e| match e {
        ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
        other => StorageError::DownloadFailed(other.to_string()),
    })?;

    result
        .bytes()
        .await
        .map_err(|e| StorageError::DownloadFailed(e.to_string()))
}

pub(crate) async fn info(store: &Arc<dyn ObjectStore>, storage_key: &str) -> StorageResult<ObjectInfo> {
    let location = Path::from(storage_key);
    let result = store.get(&location).await.map_err(|e| match e {
        ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
        other => StorageError::BackendError(other.to_string()),
    })?;

    let content_type = result.attributes.get(&Attribute::ContentType).map(|v| {
        let s: &str = v.as_ref();
        s.to_string()
    });

    Ok(ObjectInfo {
        size: result.meta.size as u64,
        content_type,
    })
}

pub(crate) async fn delete(store: &Arc<dyn ObjectStore>, storage_key: &str) -> ObjectResult<()> {
    let location = Path::from(storage_key);
    match store.delete(&location).await {
        Ok(()) | Err(ObjectStoreError::NotFound { .. }) => Ok(()),
        Err(e) => Err(e),
    }
}

pub(crate) async fn exists(store: &Arc<dyn ObjectStore>, storage_key: &str) -> StorageResult<bool> {
    let location = Path::from(storage_key);
    match store.head(&location).await {
        Ok(_) => Ok(true),
        Err(ObjectStoreError::NotFound { .. }) => Ok(false),
        Err(e) => Err(StorageError::BackendError(e.to_string())),
    }
}
