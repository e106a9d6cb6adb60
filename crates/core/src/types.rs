//! Domain types for representing extracted ebook content.

use serde::{Deserialize, Serialize};

/// Normalized parse result of a source document.
///
/// Produced once by a source reader and consumed read-only by every
/// renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Full document text.
    pub text: String,

    /// Title derived from the document or its filename.
    pub title: Option<String>,

    /// Chapters in reading order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chapters: Vec<String>,

    /// Images harvested from the source, in page order.
    #[serde(default)]
    pub images: Vec<ExtractedImage>,
}

impl ExtractedContent {
    /// Create content from text and chapters, without title or images.
    pub fn new(text: impl Into<String>, chapters: Vec<String>) -> Self {
        Self {
            text: text.into(),
            title: None,
            chapters,
            images: Vec::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach harvested images.
    pub fn with_images(mut self, images: Vec<ExtractedImage>) -> Self {
        self.images = images;
        self
    }

    /// Title if present, otherwise the supplied fallback.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(fallback)
    }

    /// Images attributed to the given zero-based index.
    ///
    /// Attribution is by raw page index. When chapters come from a
    /// paragraph or length fallback this no longer lines up with the
    /// document's real pages.
    pub fn images_for(&self, index: usize) -> Vec<&ExtractedImage> {
        self.images
            .iter()
            .filter(|img| img.page_index == index)
            .collect()
    }

    /// Whether there is anything to render.
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty() || self.chapters.iter().any(|c| !c.trim().is_empty())
    }
}

/// An image found in the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedImage {
    /// Encoded image bytes. Not persisted with the book list.
    #[serde(skip)]
    pub data: Vec<u8>,

    /// Encoding of `data`.
    pub format: ImageFormat,

    /// Zero-based page the image was found on.
    pub page_index: usize,

    /// Pixel width, if the source declared it.
    pub width: Option<u32>,

    /// Pixel height, if the source declared it.
    pub height: Option<u32>,
}

impl ExtractedImage {
    /// Create an image with unknown dimensions.
    pub fn new(data: Vec<u8>, format: ImageFormat, page_index: usize) -> Self {
        Self {
            data,
            format,
            page_index,
            width: None,
            height: None,
        }
    }

    /// Record pixel dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Height divided by width, when both are known and non-zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(h as f64 / w as f64),
            _ => None,
        }
    }
}

/// Encoding of an extracted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// File extension used inside packages.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    /// MIME type.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        None
    }
}

/// The kind of source document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Epub,
    Mobi,
    /// Plain text; also the fallback for unknown extensions.
    Text,
}

impl SourceFormat {
    /// Detect format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "epub" => Self::Epub,
            "mobi" => Self::Mobi,
            _ => Self::Text,
        }
    }

    /// Detect format from a declared file name.
    pub fn from_file_name(file_name: &str) -> Self {
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| Self::from_extension(ext))
            .unwrap_or(Self::Text)
    }

    /// Whether the bytes carry the PDF header.
    pub fn looks_like_pdf(bytes: &[u8]) -> bool {
        bytes.starts_with(b"%PDF-")
    }
}

/// Processing state of an uploaded ebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EbookStatus {
    Processing,
    Ready,
}

/// Which export formats can be offered for a book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatAvailability {
    pub pptx: bool,
    pub doc: bool,
    pub pdf: bool,
}

impl FormatAvailability {
    /// Every export format enabled.
    pub fn all() -> Self {
        Self {
            pptx: true,
            doc: true,
            pdf: true,
        }
    }
}

/// An uploaded ebook as tracked by the book list.
///
/// `extracted_content` is present exactly when `status` is `Ready`; the
/// constructors below are the only way to move between the two states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ebook {
    pub id: String,
    pub name: String,
    pub file_name: String,
    pub file_size: u64,
    /// Seconds since the Unix epoch.
    pub upload_date: u64,
    pub status: EbookStatus,
    pub formats: FormatAvailability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_content: Option<ExtractedContent>,
}

impl Ebook {
    /// A freshly uploaded book whose content has not been extracted yet.
    pub fn processing(
        id: impl Into<String>,
        file_name: impl Into<String>,
        file_size: u64,
        upload_date: u64,
    ) -> Self {
        let file_name = file_name.into();
        let name = file_stem(&file_name).to_string();
        Self {
            id: id.into(),
            name,
            file_name,
            file_size,
            upload_date,
            status: EbookStatus::Processing,
            formats: FormatAvailability::default(),
            extracted_content: None,
        }
    }

    /// Attach extracted content and mark the book ready for export.
    pub fn mark_ready(mut self, content: ExtractedContent) -> Self {
        self.status = EbookStatus::Ready;
        self.formats = FormatAvailability::all();
        self.extracted_content = Some(content);
        self
    }

    /// A copy for list persistence: the text is kept, chapters are dropped
    /// since they only repeat it.
    pub fn to_list_record(&self) -> Self {
        let mut record = self.clone();
        if let Some(content) = record.extracted_content.as_mut() {
            content.chapters.clear();
        }
        record
    }

    /// Whether status and content agree.
    pub fn is_consistent(&self) -> bool {
        (self.status == EbookStatus::Ready) == self.extracted_content.is_some()
    }
}

/// File name without its final extension.
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
