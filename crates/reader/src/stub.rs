//! Placeholder extraction for EPUB and MOBI uploads.

use ebook_core::types::file_stem;
use ebook_core::{ExtractedContent, SourceFormat};

/// Produces a placeholder for formats whose containers are not parsed.
#[derive(Debug, Clone, Default)]
pub struct StubExtractor;

impl StubExtractor {
    /// Create a new stub extractor.
    pub fn new() -> Self {
        Self
    }

    /// Build placeholder content naming the limitation.
    pub fn extract(&self, format: SourceFormat, filename: &str) -> ExtractedContent {
        let label = match format {
            SourceFormat::Epub => "EPUB",
            SourceFormat::Mobi => "MOBI",
            _ => "This format",
        };

        log::warn!("{} text extraction is not supported; using placeholder for '{}'", label, filename);

        let text = format!(
            "{} file processing is limited. Full text extraction from '{}' is not \
             supported yet; convert the book to PDF or plain text for complete results.",
            label, filename
        );

        ExtractedContent::new(text.clone(), vec![text]).with_title(file_stem(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epub_placeholder() {
        let content = StubExtractor::new().extract(SourceFormat::Epub, "Dune.epub");

        assert!(content.text.starts_with("EPUB file processing is limited"));
        assert!(content.text.contains("Dune.epub"));
        assert_eq!(content.title.as_deref(), Some("Dune"));
        assert_eq!(content.chapters.len(), 1);
    }

    #[test]
    fn test_mobi_placeholder() {
        let content = StubExtractor::new().extract(SourceFormat::Mobi, "old.book.mobi");
        assert!(content.text.starts_with("MOBI"));
        assert_eq!(content.title.as_deref(), Some("old.book"));
    }
}
