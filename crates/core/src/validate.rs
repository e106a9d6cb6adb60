//! Upload checks applied before a file reaches a source reader.

use crate::error::{Error, Result};

/// Extensions accepted for upload.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "epub", "mobi", "txt"];

/// Largest accepted upload, in bytes (100 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Reject files with an unsupported extension or an oversize body.
pub fn validate_upload(file_name: &str, size: u64) -> Result<()> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(Error::ValidationError(format!(
            "'{}' is not a supported ebook; expected one of .{}",
            file_name,
            ACCEPTED_EXTENSIONS.join(", .")
        )));
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(Error::ValidationError(format!(
            "'{}' is {} bytes, over the {} MB limit",
            file_name,
            size,
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    Ok(())
}
