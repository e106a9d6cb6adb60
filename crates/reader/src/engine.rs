//! PDF parsing engine and its process-wide, load-once cell.

use ebook_core::{Error, ExtractedImage, ImageFormat, Result};
use lopdf::{Document, ObjectId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

/// A loaded PDF parsing engine.
pub trait PdfEngine: Send + Sync {
    /// Short engine name for logs.
    fn name(&self) -> &'static str;

    /// Open a document held in memory.
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfPages>>;
}

/// Page-level access to an opened PDF. Page numbers are 1-based.
pub trait PdfPages {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text runs of one page, in content order.
    fn page_runs(&self, page: usize) -> Result<Vec<String>>;

    /// Images drawn on one page.
    fn page_images(&self, _page: usize) -> Result<Vec<ExtractedImage>> {
        Ok(Vec::new())
    }
}

/// Function that loads an engine.
pub type EngineLoader = fn() -> Result<Arc<dyn PdfEngine>>;

/// Holds an engine that is loaded on first use and shared afterwards.
///
/// Concurrent callers wait on the same guard, so the loader runs at most
/// once per successful load. A failed load is not remembered and the next
/// caller tries again.
pub struct EngineCell {
    loader: EngineLoader,
    engine: Mutex<Option<Arc<dyn PdfEngine>>>,
    loads: AtomicUsize,
}

impl EngineCell {
    /// Create an empty cell that will use `loader`.
    pub fn new(loader: EngineLoader) -> Self {
        Self {
            loader,
            engine: Mutex::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// Return the engine, loading it if this is the first call.
    pub fn get(&self) -> Result<Arc<dyn PdfEngine>> {
        let mut slot = self
            .engine
            .lock()
            .map_err(|_| Error::ExtractionError("PDF engine lock poisoned".to_string()))?;

        if let Some(engine) = slot.as_ref() {
            return Ok(Arc::clone(engine));
        }

        self.loads.fetch_add(1, Ordering::SeqCst);
        let engine = (self.loader)()?;
        log::debug!("Loaded PDF engine '{}'", engine.name());
        *slot = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// Number of times the loader has been invoked.
    pub fn load_attempts(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Whether an engine is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.engine.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

impl std::fmt::Debug for EngineCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCell")
            .field("loaded", &self.is_loaded())
            .field("load_attempts", &self.load_attempts())
            .finish()
    }
}

/// The engine cell shared by every default-constructed PDF extractor.
pub static SHARED_ENGINE: LazyLock<Arc<EngineCell>> =
    LazyLock::new(|| Arc::new(EngineCell::new(load_lopdf)));

/// Loader for the built-in `lopdf` engine.
pub fn load_lopdf() -> Result<Arc<dyn PdfEngine>> {
    Ok(Arc::new(LopdfEngine))
}

/// PDF engine backed by `lopdf`.
#[derive(Debug, Default)]
pub struct LopdfEngine;

impl PdfEngine for LopdfEngine {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfPages>> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| Error::ExtractionError(format!("Failed to open PDF: {}", e)))?;

        if doc.is_encrypted() {
            return Err(Error::ExtractionError(
                "PDF is encrypted and cannot be read".to_string(),
            ));
        }

        let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
        Ok(Box::new(LopdfPages { doc, pages }))
    }
}

/// An opened `lopdf` document with its page table.
struct LopdfPages {
    doc: Document,
    /// (page number, page object id), in page order.
    pages: Vec<(u32, ObjectId)>,
}

impl LopdfPages {
    fn page_entry(&self, page: usize) -> Result<(u32, ObjectId)> {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx))
            .copied()
            .ok_or_else(|| Error::ExtractionError(format!("Page {} out of range", page)))
    }
}

impl PdfPages for LopdfPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_runs(&self, page: usize) -> Result<Vec<String>> {
        let (number, _) = self.page_entry(page)?;
        let text = self
            .doc
            .extract_text(&[number])
            .map_err(|e| Error::ExtractionError(format!("Page {}: {}", page, e)))?;

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|run| !run.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn page_images(&self, page: usize) -> Result<Vec<ExtractedImage>> {
        let (_, page_id) = self.page_entry(page)?;
        let images = match self.doc.get_page_images(page_id) {
            Ok(images) => images,
            // No XObject resources on the page.
            Err(lopdf::Error::DictKey) => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::ExtractionError(format!("Page {} images: {}", page, e)));
            }
        };

        let mut extracted = Vec::new();
        for image in images {
            let is_jpeg = image
                .filters
                .as_ref()
                .map(|filters| filters.iter().any(|f| f == "DCTDecode"))
                .unwrap_or(false);

            // Only baseline JPEG streams can be embedded without re-encoding.
            if !is_jpeg || ImageFormat::from_magic(image.content) != Some(ImageFormat::Jpeg) {
                log::debug!("Skipping non-JPEG image {:?} on page {}", image.id, page);
                continue;
            }

            let mut img = ExtractedImage::new(image.content.to_vec(), ImageFormat::Jpeg, page - 1);
            if let (Ok(w), Ok(h)) = (u32::try_from(image.width), u32::try_from(image.height)) {
                img = img.with_size(w, h);
            }
            extracted.push(img);
        }

        Ok(extracted)
    }
}
