//! PDF page extraction.
//!
//! Pages are read one at a time. A page that fails is logged and skipped,
//! so one corrupt page never costs the rest of the document.

use crate::engine::{EngineCell, PdfPages, SHARED_ENGINE};
use ebook_core::sanitize::truncate_chars;
use ebook_core::types::file_stem;
use ebook_core::{ChapterSegmenter, ExtractedContent, ExtractedImage, Result};
use std::sync::Arc;

/// Longest title taken from page text.
const MAX_TITLE_CHARS: usize = 100;

/// First lines at or below this length are not trusted as titles.
const MIN_TITLE_CHARS: usize = 5;

/// A page that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// 1-based page number.
    pub page: usize,
    pub message: String,
}

/// Result of walking every page of a document.
#[derive(Debug, Default)]
pub struct PageScan {
    /// Non-empty page texts, in page order.
    pub pages: Vec<String>,
    /// Images from every readable page.
    pub images: Vec<ExtractedImage>,
    /// Pages that failed and were skipped.
    pub failures: Vec<PageFailure>,
}

/// Run `op` on every item, keeping successes and reporting failures to
/// `on_failure` without stopping.
pub fn best_effort_map<I, T, F, E>(items: I, mut op: F, mut on_failure: E) -> Vec<T>
where
    I: IntoIterator<Item = usize>,
    F: FnMut(usize) -> Result<T>,
    E: FnMut(usize, ebook_core::Error),
{
    let mut results = Vec::new();
    for item in items {
        match op(item) {
            Ok(value) => results.push(value),
            Err(e) => on_failure(item, e),
        }
    }
    results
}

/// Extracts page-ordered text from PDF bytes.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    engine: Arc<EngineCell>,
    segmenter: ChapterSegmenter,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor {
    /// Create an extractor using the process-wide engine.
    pub fn new() -> Self {
        Self::with_engine(Arc::clone(&SHARED_ENGINE))
    }

    /// Create an extractor using a specific engine cell.
    pub fn with_engine(engine: Arc<EngineCell>) -> Self {
        Self {
            engine,
            segmenter: ChapterSegmenter::new(),
        }
    }

    /// Use a custom chapter segmenter.
    pub fn with_segmenter(mut self, segmenter: ChapterSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// The engine cell this extractor draws from.
    pub fn engine(&self) -> &Arc<EngineCell> {
        &self.engine
    }

    /// Extract content from PDF bytes.
    ///
    /// An engine that fails to load yields placeholder content rather than
    /// an error. A document the engine cannot open is an error.
    pub fn extract(&self, bytes: &[u8], filename: &str) -> Result<ExtractedContent> {
        let fallback_title = file_stem(filename);

        let engine = match self.engine.get() {
            Ok(engine) => engine,
            Err(e) => {
                log::warn!("PDF engine unavailable for '{}': {}", filename, e);
                let text = format!(
                    "PDF text extraction is unavailable ({}). The file '{}' was uploaded but \
                     its text could not be read.",
                    e, filename
                );
                return Ok(ExtractedContent::new(text.clone(), vec![text]).with_title(fallback_title));
            }
        };

        let doc = engine.open(bytes)?;
        log::debug!("Opened '{}' with {}: {} pages", filename, engine.name(), doc.page_count());

        let scan = scan_pages(doc.as_ref());
        for failure in &scan.failures {
            log::warn!(
                "Skipping page {} of '{}': {}",
                failure.page,
                filename,
                failure.message
            );
        }

        if scan.pages.is_empty() {
            log::warn!("No extractable text in '{}'", filename);
            let text = format!(
                "No extractable text was found in '{}'. The PDF may contain only scanned \
                 images; text recognition (OCR) would be needed to read it.",
                filename
            );
            return Ok(ExtractedContent::new(text, Vec::new())
                .with_title(fallback_title)
                .with_images(scan.images));
        }

        let title = detect_title(&scan.pages).unwrap_or_else(|| fallback_title.to_string());
        let text = scan.pages.join("\n\n");
        let chapters = self.segmenter.segment(&text);

        log::debug!(
            "Extracted {} pages, {} chapters, {} images from '{}'",
            scan.pages.len(),
            chapters.len(),
            scan.images.len(),
            filename
        );

        Ok(ExtractedContent::new(text, chapters)
            .with_title(title)
            .with_images(scan.images))
    }
}

/// Walk pages `1..=N`, collecting text and images and isolating failures.
pub fn scan_pages(doc: &dyn PdfPages) -> PageScan {
    let mut failures = Vec::new();

    let page_texts = best_effort_map(
        1..=doc.page_count(),
        |page| doc.page_runs(page).map(|runs| (page, runs.join(" "))),
        |page, e| {
            failures.push(PageFailure {
                page,
                message: e.to_string(),
            })
        },
    );

    let mut images = Vec::new();
    for (page, _) in &page_texts {
        match doc.page_images(*page) {
            Ok(found) => images.extend(found),
            Err(e) => log::warn!("Skipping images on page {}: {}", page, e),
        }
    }

    let pages = page_texts
        .into_iter()
        .map(|(_, text)| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    PageScan {
        pages,
        images,
        failures,
    }
}

/// First non-empty line of the first page, if it is long enough to trust.
fn detect_title(pages: &[String]) -> Option<String> {
    let first_line = pages.first()?.lines().map(str::trim).find(|l| !l.is_empty())?;
    if first_line.chars().count() > MIN_TITLE_CHARS {
        Some(truncate_chars(first_line, MAX_TITLE_CHARS).trim_end().to_string())
    } else {
        None
    }
}
