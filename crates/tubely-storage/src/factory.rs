#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::{S3Credentials, S3Storage};
use crate::{MemoryStorage, Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::Config;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint().map(String::from);
            let distribution = config.s3_cf_distribution().map(String::from);
            let credentials =
                config
                    .s3_credentials()
                    .map(|(access_key_id, secret_access_key)| S3Credentials {
                        access_key_id: access_key_id.to_string(),
                        secret_access_key: secret_access_key.to_string(),
                    });

            let storage =
                S3Storage::new(bucket, region, endpoint, distribution, credentials).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new(
            config.memory_storage_base_url(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::config::TubelyConfig;

    #[tokio::test]
    async fn test_memory_backend_from_config() {
        let config = Config(Box::new(TubelyConfig::in_memory(
            "0123456789abcdef0123456789abcdef",
        )));
        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Memory);
        assert_eq!(
            storage.public_url("other/a.mp4"),
            "memory://tubely/other/a.mp4"
        );
    }

    #[tokio::test]
    async fn test_s3_backend_requires_bucket() {
        let mut inner = TubelyConfig::in_memory("0123456789abcdef0123456789abcdef");
        inner.storage_backend = StorageBackend::S3;
        let result = create_storage(&Config(Box::new(inner))).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[cfg(feature = "storage-s3")]
    #[tokio::test]
    async fn test_s3_backend_with_configured_keys() {
        let mut inner = TubelyConfig::in_memory("0123456789abcdef0123456789abcdef");
        inner.storage_backend = StorageBackend::S3;
        inner.s3_bucket = Some("tubely-videos".to_string());
        inner.s3_region = Some("us-east-1".to_string());
        inner.s3_endpoint = Some("http://localhost:9000".to_string());
        inner.aws_access_key_id = Some("minioadmin".to_string());
        inner.aws_secret_access_key = Some("minioadmin-secret".to_string());

        let storage = create_storage(&Config(Box::new(inner))).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::S3);
        assert_eq!(
            storage.public_url("other/a.mp4"),
            "http://localhost:9000/tubely-videos/other/a.mp4"
        );
    }
}
