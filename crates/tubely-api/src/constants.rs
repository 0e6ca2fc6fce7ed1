/// API path prefix for versioned routes.
pub const API_PREFIX: &str = "/api/v0";

/// Multipart field carrying the video file.
pub const VIDEO_FIELD: &str = "video";

/// Multipart field carrying the thumbnail image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Allowance on top of the video bound for multipart boundaries and headers.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 1 << 20;
