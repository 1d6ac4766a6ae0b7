//! Request parameter validation.
//!
//! Query parameters arrive as signed integers so that negative values can be
//! reported as validation errors instead of generic parse failures.

use crate::error::CoreError;
use crate::timeline::{MAX_BIN_SECS, MIN_BIN_SECS};

/// Validate that a frame number is non-negative.
pub fn validate_frame(name: &str, frame: i64) -> Result<u64, CoreError> {
    u64::try_from(frame)
        .map_err(|_| CoreError::Validation(format!("{name} must be >= 0, got {frame}")))
}

/// Validate a timeline bin width in seconds.
pub fn validate_bin_secs(bin_secs: i64) -> Result<u64, CoreError> {
    match u64::try_from(bin_secs) {
        Ok(v) if (MIN_BIN_SECS..=MAX_BIN_SECS).contains(&v) => Ok(v),
        _ => Err(CoreError::Validation(format!(
            "bin_sec must be between {MIN_BIN_SECS} and {MAX_BIN_SECS}, got {bin_secs}"
        ))),
    }
}

/// Validate a video identifier before it is used to build a file name.
///
/// Rejects empty ids, path separators, and anything starting with a dot.
pub fn validate_video_id(video_id: &str) -> Result<(), CoreError> {
    if video_id.is_empty() {
        return Err(CoreError::Validation("video_id must not be empty".to_string()));
    }
    if video_id.starts_with('.') || video_id.contains(['/', '\\', '\0']) {
        return Err(CoreError::Validation(format!(
            "invalid video_id '{video_id}'"
        )));
    }
    Ok(())
}
