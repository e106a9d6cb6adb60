//! Plain text extraction.

use ebook_core::sanitize::truncate_chars;
use ebook_core::segment::split_paragraphs;
use ebook_core::types::file_stem;
use ebook_core::{Error, ExtractedContent, Result};

/// Longest title taken from the first line.
const MAX_TITLE_CHARS: usize = 100;

/// Extracts content from UTF-8 text files.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor.
    pub fn new() -> Self {
        Self
    }

    /// Decode and structure a text file.
    ///
    /// Chapters are the blank-line-separated paragraphs when there is more
    /// than one, otherwise the individual non-empty lines.
    pub fn extract(&self, bytes: &[u8], filename: &str) -> Result<ExtractedContent> {
        let decoded = std::str::from_utf8(bytes).map_err(|e| {
            Error::ExtractionError(format!(
                "'{}' is not valid UTF-8 text (invalid byte at offset {})",
                filename,
                e.valid_up_to()
            ))
        })?;

        let text = decoded
            .strip_prefix('\u{FEFF}')
            .unwrap_or(decoded)
            .replace("\r\n", "\n")
            .replace('\r', "\n");

        if text.trim().is_empty() {
            return Err(Error::EmptyContentError(filename.to_string()));
        }

        let paragraphs = split_paragraphs(&text);
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let title = lines
            .first()
            .map(|line| truncate_chars(line, MAX_TITLE_CHARS).trim_end().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| file_stem(filename).to_string());

        let chapters: Vec<String> = if paragraphs.len() > 1 {
            paragraphs.iter().map(|p| p.to_string()).collect()
        } else {
            lines.iter().map(|l| l.to_string()).collect()
        };

        log::debug!(
            "Extracted {} chars, {} chapters from '{}'",
            text.len(),
            chapters.len(),
            filename
        );

        Ok(ExtractedContent::new(text, chapters).with_title(title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_an_error() {
        let err = TextExtractor::new().extract(b"", "empty.txt").unwrap_err();
        assert!(matches!(err, Error::EmptyContentError(_)));

        let err = TextExtractor::new().extract(b"  \n\t\n ", "blank.txt").unwrap_err();
        assert!(matches!(err, Error::EmptyContentError(_)));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = TextExtractor::new().extract(&[b'o', b'k', 0xFF, 0xFE], "bin.txt").unwrap_err();
        assert!(matches!(err, Error::ExtractionError(_)));
        assert!(err.to_string().contains("offset 2"));
    }

    #[test]
    fn test_paragraphs_become_chapters() {
        let content = TextExtractor::new()
            .extract(b"My Title\n\nFirst paragraph.\nStill first.\n\nSecond.", "book.txt")
            .unwrap();

        assert_eq!(content.title.as_deref(), Some("My Title"));
        assert_eq!(
            content.chapters,
            vec!["My Title", "First paragraph.\nStill first.", "Second."]
        );
    }

    #[test]
    fn test_single_paragraph_uses_lines() {
        let content = TextExtractor::new()
            .extract(b"line one\nline two\n  \nline three", "poem.txt")
            .unwrap();
        // A whitespace-only line still separates paragraphs.
        assert_eq!(content.chapters.len(), 2);

        let content = TextExtractor::new()
            .extract(b"line one\nline two\nline three\n", "poem.txt")
            .unwrap();
        assert_eq!(content.chapters, vec!["line one", "line two", "line three"]);
    }

    #[test]
    fn test_crlf_and_bom_normalized() {
        let content = TextExtractor::new()
            .extract("\u{FEFF}Title\r\n\r\nBody".as_bytes(), "win.txt")
            .unwrap();

        assert_eq!(content.text, "Title\n\nBody");
        assert_eq!(content.title.as_deref(), Some("Title"));
    }

    #[test]
    fn test_long_first_line_truncated() {
        let text = format!("{}\n\nrest", "é".repeat(150));
        let content = TextExtractor::new().extract(text.as_bytes(), "long.txt").unwrap();
        assert_eq!(content.title.unwrap().chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let bytes = b"Alpha\n\nBeta\n\nGamma";
        let first = TextExtractor::new().extract(bytes, "a.txt").unwrap();
        let second = TextExtractor::new().extract(bytes, "a.txt").unwrap();
        assert_eq!(first, second);
    }
}
