//! Size limits for bodies and attachments
//!
//! Attachment sizes are computed from the base64 length alone, the payload is
//! never decoded just to be measured.

use crate::error::{AppError, Result};
use serde::Serialize;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Values upstream forms send when a file never made it into the request
const PLACEHOLDER_CONTENT: [&str; 2] = ["undefined", "null"];

/// Render a byte limit as megabytes, without a trailing `.0`
pub fn format_megabytes(bytes: u64) -> String {
    format!("{}", bytes as f64 / BYTES_PER_MB)
}

/// Fail when the UTF-8 size of `body` exceeds `max_bytes`
pub fn validate_body_size(body: &str, max_bytes: u64) -> Result<()> {
    let size = body.len() as u64;
    if size > max_bytes {
        return Err(AppError::Validation(format!(
            "Body size exceeds the maximum limit of {} MB.",
            format_megabytes(max_bytes)
        )));
    }
    Ok(())
}

/// Same as [`validate_body_size`] for structured payloads, measured as JSON
pub fn validate_payload_size<T: Serialize + ?Sized>(payload: &T, max_bytes: u64) -> Result<()> {
    let serialized = serde_json::to_string(payload)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize body: {}", e)))?;
    validate_body_size(&serialized, max_bytes)
}

/// Decoded byte size of a base64 string: `floor(len * 3 / 4) - padding`.
///
/// Empty and placeholder values are rejected instead of counting as zero bytes.
pub fn base64_decoded_size(base64: &str) -> Result<u64> {
    let trimmed = base64.trim();
    if trimmed.is_empty() || PLACEHOLDER_CONTENT.contains(&trimmed) {
        return Err(AppError::Validation(
            "Attachment content is missing or is not valid base64".to_string(),
        ));
    }

    let padding = if trimmed.ends_with("==") {
        2
    } else if trimmed.ends_with('=') {
        1
    } else {
        0
    };

    let len = trimmed.len() as u64;
    Ok((len * 3 / 4).saturating_sub(padding))
}

/// Fail when the decoded size of `base64` exceeds `max_bytes`
pub fn validate_attachment_size(base64: &str, file_name: &str, max_bytes: u64) -> Result<u64> {
    let size = base64_decoded_size(base64).map_err(|_| {
        AppError::Validation(format!("File {} has no valid base64 content.", file_name))
    })?;

    if size > max_bytes {
        return Err(AppError::Validation(format!(
            "File {} exceeds the size limit of {}MB.",
            file_name,
            format_megabytes(max_bytes)
        )));
    }
    Ok(size)
}
