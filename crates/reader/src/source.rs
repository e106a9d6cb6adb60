//! Extension-based dispatch to the right extractor.

use crate::pdf::PdfExtractor;
use crate::stub::StubExtractor;
use crate::text::TextExtractor;
use ebook_core::{ExtractedContent, Result, SourceFormat};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads an uploaded file into [`ExtractedContent`].
///
/// The declared file name picks the extractor and supplies the fallback
/// title; nothing else about it is trusted.
#[derive(Debug, Clone, Default)]
pub struct SourceReader {
    pdf: PdfExtractor,
    text: TextExtractor,
    stub: StubExtractor,
}

impl SourceReader {
    /// Create a reader using the shared PDF engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific PDF extractor.
    pub fn with_pdf_extractor(mut self, pdf: PdfExtractor) -> Self {
        self.pdf = pdf;
        self
    }

    /// Read everything from `reader` and extract it.
    pub fn read<R: Read>(&self, mut reader: R, filename: &str) -> Result<ExtractedContent> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.read_bytes(&bytes, filename)
    }

    /// Extract content from a file on disk.
    pub fn read_path(&self, path: &Path) -> Result<ExtractedContent> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        let file = File::open(path)?;
        self.read(BufReader::new(file), filename)
    }

    /// Extract content from bytes already in memory.
    pub fn read_bytes(&self, bytes: &[u8], filename: &str) -> Result<ExtractedContent> {
        let format = SourceFormat::from_file_name(filename);
        log::debug!("Reading '{}' ({} bytes) as {:?}", filename, bytes.len(), format);

        if format != SourceFormat::Pdf && SourceFormat::looks_like_pdf(bytes) {
            log::warn!(
                "'{}' starts with a PDF header but is named as {:?}; reading by extension",
                filename,
                format
            );
        }

        match format {
            SourceFormat::Pdf => self.pdf.extract(bytes, filename),
            SourceFormat::Epub | SourceFormat::Mobi => Ok(self.stub.extract(format, filename)),
            SourceFormat::Text => self.text.extract(bytes, filename),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineCell, PdfEngine, PdfPages};
    use ebook_core::Error;
    use std::io::Cursor;
    use std::sync::Arc;

    struct OnePage;

    impl PdfPages for OnePage {
        fn page_count(&self) -> usize {
            1
        }

        fn page_runs(&self, _page: usize) -> Result<Vec<String>> {
            Ok(vec!["Chapter 1 opens.".to_string()])
        }
    }

    struct OnePageEngine;

    impl PdfEngine for OnePageEngine {
        fn name(&self) -> &'static str {
            "one-page"
        }

        fn open(&self, _bytes: &[u8]) -> Result<Box<dyn PdfPages>> {
            Ok(Box::new(OnePage))
        }
    }

    fn load_one_page() -> Result<Arc<dyn PdfEngine>> {
        Ok(Arc::new(OnePageEngine))
    }

    fn reader() -> SourceReader {
        SourceReader::new().with_pdf_extractor(PdfExtractor::with_engine(Arc::new(
            EngineCell::new(load_one_page),
        )))
    }

    #[test]
    fn test_dispatch_pdf() {
        let content = reader().read(Cursor::new(b"%PDF-1.4"), "Book.PDF").unwrap();
        assert_eq!(content.text, "Chapter 1 opens.");
    }

    #[test]
    fn test_dispatch_stub() {
        let content = reader().read_bytes(b"PK\x03\x04", "novel.epub").unwrap();
        assert!(content.text.contains("EPUB"));
        assert_eq!(content.title.as_deref(), Some("novel"));
    }

    #[test]
    fn test_dispatch_text_for_unknown_extensions() {
        let content = reader().read_bytes(b"hello\nworld", "notes.md").unwrap();
        assert_eq!(content.chapters, vec!["hello", "world"]);
    }

    #[test]
    fn test_zero_byte_txt() {
        let err = reader().read(Cursor::new(Vec::new()), "empty.txt").unwrap_err();
        assert!(matches!(err, Error::EmptyContentError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = reader().read_path(Path::new("/nonexistent/dir/book.txt")).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}
