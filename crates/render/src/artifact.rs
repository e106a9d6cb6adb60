//! Downloadable output files and the checks every renderer shares.

use ebook_core::sanitize::sanitize_file_name;
use ebook_core::{Error, ExtractedContent, Result};
use serde::Serialize;

/// A rendered file ready to be saved or offered for download.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    /// Sanitized file name including extension.
    pub file_name: String,

    /// MIME type of `bytes`.
    pub media_type: &'static str,

    /// File contents.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Create an artifact named `<base>.<extension>`.
    pub fn new(base: &str, extension: &str, media_type: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("{}.{}", base, extension),
            media_type,
            bytes,
        }
    }

    /// Size of the contents in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the contents are empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Base name for artifacts: the original file name if given, else the book name.
pub fn artifact_base_name(book_name: &str, original_file_name: Option<&str>) -> String {
    let source = original_file_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(book_name);
    sanitize_file_name(source)
}

/// Reject absent or empty content before any output is produced.
pub fn require_content(content: Option<&ExtractedContent>) -> Result<&ExtractedContent> {
    let content = content.ok_or_else(|| {
        Error::RenderError("No extracted content available for this book".to_string())
    })?;

    if !content.has_content() {
        return Err(Error::RenderError(
            "Extracted content has no text to render".to_string(),
        ));
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_prefers_original_file() {
        assert_eq!(artifact_base_name("Book", Some("My Book! (v2).pdf")), "My_Book_v2");
        assert_eq!(artifact_base_name("The Book", None), "The_Book");
        assert_eq!(artifact_base_name("The Book", Some("  ")), "The_Book");
    }

    #[test]
    fn test_require_content() {
        assert!(matches!(require_content(None), Err(Error::RenderError(_))));

        let empty = ExtractedContent::new("  ", vec![]);
        assert!(matches!(require_content(Some(&empty)), Err(Error::RenderError(_))));

        let ok = ExtractedContent::new("text", vec![]);
        assert!(require_content(Some(&ok)).is_ok());
    }
}
