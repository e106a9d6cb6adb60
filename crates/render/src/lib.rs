//! Presentation, document, and print renderers for extracted ebook content.
//!
//! Every renderer takes the book name, its extracted content, and optionally
//! the original upload name, and returns named in-memory artifacts.

pub mod artifact;
pub mod document;
pub mod pptx;
pub mod presentation;
pub mod print;

pub use artifact::Artifact;
pub use document::DocumentRenderer;
pub use presentation::PresentationRenderer;
pub use print::{PrintHost, PrintJob, PrintRenderer};
