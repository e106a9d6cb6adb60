//! Error types for ebook extraction and export.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting or rendering an ebook.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The upload was rejected (unsupported extension or oversize file).
    #[error("Invalid upload: {0}")]
    ValidationError(String),

    /// The source file is corrupt or could not be decoded.
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// The source decoded to nothing but whitespace.
    #[error("No content found in '{0}'")]
    EmptyContentError(String),

    /// Rendering was attempted without usable content, or serialization failed.
    #[error("Render error: {0}")]
    RenderError(String),

    /// ZIP archive error (for PPTX output).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML generation error (for PPTX output).
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// Whether this failure happened before any content was produced.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            Error::IoError(_) | Error::ExtractionError(_) | Error::EmptyContentError(_)
        )
    }
}
