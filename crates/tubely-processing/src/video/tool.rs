//! Spawning ffmpeg/ffprobe with a deadline.

use std::ffi::OsString;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::error::MediaError;

/// Validate that a tool path doesn't contain shell metacharacters or traversal.
pub(crate) fn validate_tool_path(path: &str) -> Result<(), MediaError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(MediaError::InvalidToolPath(format!(
            "Path contains dangerous characters: {}",
            path
        )));
    }

    if path.contains("..") {
        return Err(MediaError::InvalidToolPath(format!(
            "Path contains directory traversal: {}",
            path
        )));
    }

    Ok(())
}

/// Run `program` to completion, killing it when `timeout` elapses.
///
/// stdin is closed so a tool can never block on a prompt. A non-zero exit is
/// reported as [`MediaError::ToolFailed`] carrying stderr.
pub(crate) async fn run(
    tool: &'static str,
    program: &str,
    args: Vec<OsString>,
    timeout: Duration,
) -> Result<Output, MediaError> {
    let child = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| MediaError::ToolFailed {
            tool,
            message: format!("failed to execute {}: {}", program, e),
        })?;

    // On timeout the future (and the child in it) is dropped, which kills it.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| MediaError::ToolFailed {
            tool,
            message: format!("failed to wait for {}: {}", program, e),
        })?,
        Err(_) => {
            tracing::warn!(
                process.executable.name = tool,
                timeout_secs = timeout.as_secs_f64(),
                "Media tool exceeded deadline and was killed"
            );
            return Err(MediaError::ToolTimeout { tool, timeout });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::ToolFailed {
            tool,
            message: format!("exited with {}: {}", output.status, stderr.trim()),
        });
    }

    Ok(output)
}
