//! Shared constants.

/// Hard upper bound for an uploaded video body (1 GiB).
pub const MAX_VIDEO_SIZE_BYTES: u64 = 1 << 30;

/// Upper bound for an uploaded thumbnail image (10 MiB).
pub const MAX_THUMBNAIL_SIZE_BYTES: u64 = 10 << 20;

/// The only container type accepted for video uploads.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Extension used for published video objects.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Content types accepted for thumbnails.
pub const THUMBNAIL_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Key prefix for published thumbnails.
pub const THUMBNAIL_KEY_PREFIX: &str = "thumbnails";

/// Default relative tolerance used when classifying aspect ratios.
pub const DEFAULT_ASPECT_RATIO_TOLERANCE: f64 = 0.05;
