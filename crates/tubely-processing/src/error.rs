use std::time::Duration;
use tubely_core::AppError;

/// Errors raised while ingesting and processing uploaded media.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Upload exceeds limit of {limit} bytes")]
    SizeExceeded { limit: u64 },

    #[error("Unsupported content type: {content_type} (allowed: {allowed:?})")]
    UnsupportedMediaType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} failed: {message}")]
    ToolFailed { tool: &'static str, message: String },

    #[error("{tool} timed out after {}s", .timeout.as_secs())]
    ToolTimeout {
        tool: &'static str,
        timeout: Duration,
    },

    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),

    #[error("Failed to parse ffprobe output: {0}")]
    Parse(String),

    #[error("No stream with pixel dimensions found")]
    NoVideoStream,
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::SizeExceeded { limit } => AppError::SizeExceeded { limit },
            e @ MediaError::UnsupportedMediaType { .. } => {
                AppError::UnsupportedMediaType(e.to_string())
            }
            MediaError::Io(e) => AppError::Io(e),
            e @ (MediaError::ToolFailed { .. }
            | MediaError::ToolTimeout { .. }
            | MediaError::InvalidToolPath(_)) => AppError::Processing(e.to_string()),
            MediaError::Parse(msg) => AppError::Parse(msg),
            e @ MediaError::NoVideoStream => AppError::NoVideoStream(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorMetadata;

    #[test]
    fn test_tool_errors_are_processing_errors() {
        let failed: AppError = MediaError::ToolFailed {
            tool: "ffprobe",
            message: "moov atom not found".to_string(),
        }
        .into();
        assert_eq!(failed.error_type(), "Processing");

        let timed_out: AppError = MediaError::ToolTimeout {
            tool: "ffmpeg",
            timeout: Duration::from_secs(5),
        }
        .into();
        assert_eq!(timed_out.error_type(), "Processing");
        assert!(timed_out.to_string().contains("5s"));
    }

    #[test]
    fn test_status_mapping() {
        let err: AppError = MediaError::SizeExceeded { limit: 10 }.into();
        assert_eq!(err.http_status_code(), 413);

        let err: AppError = MediaError::UnsupportedMediaType {
            content_type: "video/webm".to_string(),
            allowed: vec!["video/mp4".to_string()],
        }
        .into();
        assert_eq!(err.http_status_code(), 415);

        let err: AppError = MediaError::NoVideoStream.into();
        assert_eq!(err.http_status_code(), 422);

        let err: AppError = MediaError::Parse("expected value".to_string()).into();
        assert_eq!(err.error_type(), "Parse");
    }
}
