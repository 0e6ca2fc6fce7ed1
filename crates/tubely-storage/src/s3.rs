use crate::object;
use crate::traits::{validate_key, ObjectInfo, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::ObjectStore;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// Static credentials for the bucket. Without them the builder falls back to
/// the standard AWS environment variables and instance metadata.
#[derive(Clone)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    distribution_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `distribution_url` - Optional CDN distribution that fronts the bucket.
    ///   When set, public URLs are `{distribution}/{key}`.
    /// * `credentials` - Optional static access key pair
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        distribution_url: Option<String>,
        credentials: Option<S3Credentials>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(credentials) = credentials {
            builder = builder
                .with_access_key_id(credentials.access_key_id)
                .with_secret_access_key(credentials.secret_access_key);
        }

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store: Arc::new(store),
            bucket,
            region,
            endpoint_url,
            distribution_url,
        })
    }

    /// Generate public URL for S3 object
    ///
    /// Prefers the CDN distribution. Without one, S3-compatible providers use
    /// path-style `{endpoint}/{bucket}/{key}` and AWS uses
    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref distribution) = self.distribution_url {
            let base = distribution.trim_end_matches('/');
            if base.starts_with("http://") || base.starts_with("https://") {
                format!("{}/{}", base, key)
            } else {
                format!("https://{}/{}", base, key)
            }
        } else if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        object::put_bytes(&self.store, storage_key, content_type, data)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.generate_url(storage_key))
    }

    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();

        let size = object::put_stream(&self.store, storage_key, content_type, reader)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    expected_bytes = ?content_length,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream upload failed"
                );
                e
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream upload successful"
        );

        Ok(self.generate_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();

        let bytes = object::get_bytes(&self.store, storage_key).await?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes.to_vec())
    }

    async fn object_info(&self, storage_key: &str) -> StorageResult<ObjectInfo> {
        validate_key(storage_key)?;
        object::info(&self.store, storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();

        object::delete(&self.store, storage_key).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        object::exists(&self.store, storage_key).await
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.generate_url(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage(endpoint: Option<&str>, distribution: Option<&str>) -> S3Storage {
        S3Storage::new(
            "tubely-videos".to_string(),
            "us-east-1".to_string(),
            endpoint.map(String::from),
            distribution.map(String::from),
            None,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_builds_with_static_credentials() {
        let s3 = S3Storage::new(
            "tubely-videos".to_string(),
            "eu-west-1".to_string(),
            Some("http://localhost:9000".to_string()),
            None,
            Some(S3Credentials {
                access_key_id: "minioadmin".to_string(),
                secret_access_key: "minioadmin-secret".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            s3.public_url("landscape/abc.mp4"),
            "http://localhost:9000/tubely-videos/landscape/abc.mp4"
        );
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let credentials = S3Credentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI".to_string(),
        };
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("wJalrXUtnFEMI"));
    }

    #[tokio::test]
    async fn test_url_uses_distribution_when_set() {
        let s3 = storage(None, Some("https://d111111abcdef8.cloudfront.net/")).await;
        assert_eq!(
            s3.public_url("landscape/abc.mp4"),
            "https://d111111abcdef8.cloudfront.net/landscape/abc.mp4"
        );

        let bare = storage(None, Some("d111111abcdef8.cloudfront.net")).await;
        assert_eq!(
            bare.public_url("portrait/abc.mp4"),
            "https://d111111abcdef8.cloudfront.net/portrait/abc.mp4"
        );
    }

    #[tokio::test]
    async fn test_url_falls_back_to_endpoint_then_aws() {
        let minio = storage(Some("http://localhost:9000"), None).await;
        assert_eq!(
            minio.public_url("other/abc.mp4"),
            "http://localhost:9000/tubely-videos/other/abc.mp4"
        );

        let aws = storage(None, None).await;
        assert_eq!(
            aws.public_url("other/abc.mp4"),
            "https://tubely-videos.s3.us-east-1.amazonaws.com/other/abc.mp4"
        );
        assert_eq!(aws.backend_type(), StorageBackend::S3);
    }
}
