use crate::error::MediaError;

/// Strip media type parameters and normalize case:
/// `Video/MP4; codecs="avc1"` becomes `video/mp4`.
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

/// Upload validator
///
/// Checks declared content types and sizes before anything touches disk or
/// spawns a process.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: u64,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .iter()
                .map(|ct| normalize_content_type(ct))
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate the declared content type and return its normalized form.
    pub fn validate_content_type(&self, content_type: &str) -> Result<String, MediaError> {
        let normalized = normalize_content_type(content_type);
        if !self.allowed_content_types.contains(&normalized) {
            return Err(MediaError::UnsupportedMediaType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }
        Ok(normalized)
    }

    /// Validate a known size against the limit.
    pub fn validate_file_size(&self, size: u64) -> Result<(), MediaError> {
        if size > self.max_file_size {
            return Err(MediaError::SizeExceeded {
                limit: self.max_file_size,
            });
        }
        Ok(())
    }
}
