//! Configuration module
//!
//! Environment-driven configuration for the upload service: server, auth,
//! storage backend, upload limits and external media tools.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ASPECT_RATIO_TOLERANCE, MAX_THUMBNAIL_SIZE_BYTES, MAX_VIDEO_SIZE_BYTES,
};
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const MEDIA_TOOL_TIMEOUT_SECS: u64 = 300;
const MIN_JWT_SECRET_LEN: usize = 32;

/// Upload service configuration
#[derive(Clone, Debug)]
pub struct TubelyConfig {
    pub server_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub log_format: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub s3_cf_distribution: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub memory_storage_base_url: String,
    // Upload limits
    pub max_video_size_bytes: u64,
    pub max_thumbnail_size_bytes: u64,
    pub upload_temp_dir: Option<PathBuf>,
    // External media tools
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub media_tool_timeout_secs: u64,
    pub aspect_ratio_tolerance: f64,
    /// Best-effort delete of a published object when the record update fails.
    pub delete_orphaned_uploads: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<TubelyConfig>);

impl Config {
    fn inner(&self) -> &TubelyConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = TubelyConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().jwt_secret
    }

    pub fn log_format(&self) -> &str {
        &self.inner().log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    /// Static S3 key pair as `(access_key_id, secret_access_key)`, when both are set.
    pub fn s3_credentials(&self) -> Option<(&str, &str)> {
        let inner = self.inner();
        Some((
            inner.aws_access_key_id.as_deref()?,
            inner.aws_secret_access_key.as_deref()?,
        ))
    }

    pub fn s3_cf_distribution(&self) -> Option<&str> {
        self.inner().s3_cf_distribution.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn memory_storage_base_url(&self) -> &str {
        &self.inner().memory_storage_base_url
    }

    pub fn max_video_size_bytes(&self) -> u64 {
        self.inner().max_video_size_bytes
    }

    pub fn max_thumbnail_size_bytes(&self) -> u64 {
        self.inner().max_thumbnail_size_bytes
    }

    /// Directory for ephemeral upload files; the OS temp dir when unset.
    pub fn upload_temp_dir(&self) -> PathBuf {
        self.inner()
            .upload_temp_dir
            .clone()
            .unwrap_or_else(env::temp_dir)
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn media_tool_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().media_tool_timeout_secs)
    }

    pub fn aspect_ratio_tolerance(&self) -> f64 {
        self.inner().aspect_ratio_tolerance
    }

    pub fn delete_orphaned_uploads(&self) -> bool {
        self.inner().delete_orphaned_uploads
    }
}

/// Read `key`, falling back to `default` when unset. A value that is set but
/// does not parse is an error rather than a silent default.
fn parse_env<T>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_setting(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_setting<T>(key: &str, raw: &str) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{} has invalid value {:?}: {}", key, raw, e))
}

impl TubelyConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => s.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::S3,
        };

        let config = TubelyConfig {
            server_port: env::var("SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?,
            environment,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "text".to_string())
                .to_lowercase(),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
            aws_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
            s3_cf_distribution: env::var("S3_CF_DISTRIBUTION")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            memory_storage_base_url: env::var("MEMORY_STORAGE_BASE_URL")
                .unwrap_or_else(|_| "memory://tubely".to_string()),
            max_video_size_bytes: parse_env("MAX_VIDEO_SIZE_BYTES", MAX_VIDEO_SIZE_BYTES)?,
            max_thumbnail_size_bytes: parse_env(
                "MAX_THUMBNAIL_SIZE_BYTES",
                MAX_THUMBNAIL_SIZE_BYTES,
            )?,
            upload_temp_dir: env::var("UPLOAD_TEMP_DIR").ok().map(PathBuf::from),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            media_tool_timeout_secs: parse_env("MEDIA_TOOL_TIMEOUT_SECS", MEDIA_TOOL_TIMEOUT_SECS)?,
            aspect_ratio_tolerance: parse_env(
                "ASPECT_RATIO_TOLERANCE",
                DEFAULT_ASPECT_RATIO_TOLERANCE,
            )?,
            delete_orphaned_uploads: match env::var("DELETE_ORPHANED_UPLOADS") {
                Ok(raw) => parse_setting("DELETE_ORPHANED_UPLOADS", &raw.to_lowercase())?,
                Err(_) => true,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if self.max_video_size_bytes == 0 || self.max_video_size_bytes > MAX_VIDEO_SIZE_BYTES {
            return Err(anyhow::anyhow!(
                "MAX_VIDEO_SIZE_BYTES must be between 1 and {}",
                MAX_VIDEO_SIZE_BYTES
            ));
        }

        if self.aws_access_key_id.is_some() != self.aws_secret_access_key.is_some() {
            return Err(anyhow::anyhow!(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together"
            ));
        }

        if self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_THUMBNAIL_SIZE_BYTES must be positive"));
        }

        if self.media_tool_timeout_secs == 0 {
            return Err(anyhow::anyhow!("MEDIA_TOOL_TIMEOUT_SECS must be positive"));
        }

        if !(self.aspect_ratio_tolerance >= 0.0 && self.aspect_ratio_tolerance < 1.0) {
            return Err(anyhow::anyhow!(
                "ASPECT_RATIO_TOLERANCE must be in the range [0, 1)"
            ));
        }

        // Validate storage backend configuration
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        Ok(())
    }

    /// Configuration for the in-memory backend with default limits.
    /// Used by tests and local experiments.
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        TubelyConfig {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            jwt_secret: jwt_secret.into(),
            log_format: "text".to_string(),
            storage_backend: StorageBackend::Memory,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            s3_cf_distribution: None,
            local_storage_path: None,
            local_storage_base_url: None,
            memory_storage_base_url: "memory://tubely".to_string(),
            max_video_size_bytes: MAX_VIDEO_SIZE_BYTES,
            max_thumbnail_size_bytes: MAX_THUMBNAIL_SIZE_BYTES,
            upload_temp_dir: None,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            media_tool_timeout_secs: MEDIA_TOOL_TIMEOUT_SECS,
            aspect_ratio_tolerance: DEFAULT_ASPECT_RATIO_TOLERANCE,
            delete_orphaned_uploads: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_in_memory_config_is_valid() {
        let config = Config(Box::new(TubelyConfig::in_memory(SECRET)));
        assert!(config.validate().is_ok());
        assert_eq!(config.server_port(), 8091);
        assert_eq!(config.max_video_size_bytes(), 1 << 30);
        assert_eq!(config.max_thumbnail_size_bytes(), 10 << 20);
        assert_eq!(config.media_tool_timeout(), Duration::from_secs(300));
        assert!(config.delete_orphaned_uploads());
        assert!(config.s3_credentials().is_none());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let config = TubelyConfig::in_memory("too-short");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_s3_backend_requires_bucket_and_region() {
        let mut config = TubelyConfig::in_memory(SECRET);
        config.storage_backend = StorageBackend::S3;
        assert!(config.validate().is_err());

        config.s3_bucket = Some("tubely-videos".to_string());
        assert!(config.validate().is_err());

        config.s3_region = Some("us-east-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_backend_requires_path_and_base_url() {
        let mut config = TubelyConfig::in_memory(SECRET);
        config.storage_backend = StorageBackend::Local;
        assert!(config.validate().is_err());

        config.local_storage_path = Some("/var/lib/tubely".to_string());
        config.local_storage_base_url = Some("http://localhost:8091/assets".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_video_limit_cannot_exceed_one_gib() {
        let mut config = TubelyConfig::in_memory(SECRET);
        config.max_video_size_bytes = (1 << 30) + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tolerance_bounds() {
        let mut config = TubelyConfig::in_memory(SECRET);
        config.aspect_ratio_tolerance = -0.1;
        assert!(config.validate().is_err());
        config.aspect_ratio_tolerance = 1.5;
        assert!(config.validate().is_err());
        config.aspect_ratio_tolerance = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_s3_keys_must_come_in_pairs() {
        let mut inner = TubelyConfig::in_memory(SECRET);
        inner.aws_access_key_id = Some("AKIDEXAMPLE".to_string());
        assert!(inner.validate().is_err());

        inner.aws_secret_access_key = Some("wJalrXUtnFEMI".to_string());
        assert!(inner.validate().is_ok());
        let config = Config(Box::new(inner));
        assert_eq!(
            config.s3_credentials(),
            Some(("AKIDEXAMPLE", "wJalrXUtnFEMI"))
        );
    }

    #[test]
    fn test_malformed_numbers_are_rejected() {
        let err = parse_setting::<f64>("ASPECT_RATIO_TOLERANCE", "5%").unwrap_err();
        assert!(err.to_string().contains("ASPECT_RATIO_TOLERANCE"));
        assert!(parse_setting::<u64>("MAX_VIDEO_SIZE_BYTES", "1GB").is_err());
        assert!(parse_setting::<u64>("MEDIA_TOOL_TIMEOUT_SECS", "-1").is_err());
        assert!(parse_setting::<bool>("DELETE_ORPHANED_UPLOADS", "maybe").is_err());
    }

    #[test]
    fn test_well_formed_numbers_parse() {
        assert_eq!(parse_setting::<u64>("MAX_VIDEO_SIZE_BYTES", " 1024 ").unwrap(), 1024);
        assert_eq!(parse_setting::<f64>("ASPECT_RATIO_TOLERANCE", "0.1").unwrap(), 0.1);
        assert!(!parse_setting::<bool>("DELETE_ORPHANED_UPLOADS", "false").unwrap());
    }

    #[test]
    fn test_unset_key_uses_default() {
        let value: u64 = parse_env("TUBELY_TEST_UNSET_SETTING_7F3A", 42).unwrap();
        assert_eq!(value, 42);
    }
}
