//! Core domain types, chapter segmentation, and slide packing for
//! ebook extraction and export.

pub mod error;
pub mod packer;
pub mod sanitize;
pub mod segment;
pub mod types;
pub mod validate;

pub use error::{Error, Result};
pub use packer::SlidePacker;
pub use sanitize::{escape_markup, sanitize_file_name};
pub use segment::ChapterSegmenter;
pub use types::{
    Ebook, EbookStatus, ExtractedContent, ExtractedImage, FormatAvailability, ImageFormat,
    SourceFormat,
};
pub use validate::validate_upload;
