//! Source readers that turn uploaded ebooks into normalized content.
//!
//! PDFs go through a lazily loaded, process-wide parsing engine; plain
//! text is decoded directly; EPUB and MOBI get a placeholder.

pub mod engine;
pub mod pdf;
pub mod source;
pub mod stub;
pub mod text;

pub use engine::{EngineCell, LopdfEngine, PdfEngine, PdfPages};
pub use pdf::PdfExtractor;
pub use source::SourceReader;
pub use stub::StubExtractor;
pub use text::TextExtractor;
