//! Print-oriented rendering.
//!
//! Produces a paper-styled HTML document that asks the host to print it
//! (where the user can choose "Save as PDF"), plus the raw text as a plain
//! `.txt` so the content is never hostage to a print dialog.

use crate::artifact::{artifact_base_name, require_content, Artifact};
use crate::document::paragraph_blocks;
use ebook_core::sanitize::escape_markup;
use ebook_core::{ExtractedContent, Result};

/// MIME type of the print document.
pub const HTML_MEDIA_TYPE: &str = "text/html; charset=utf-8";

/// MIME type of the plain-text fallback.
pub const TEXT_MEDIA_TYPE: &str = "text/plain; charset=utf-8";

const PRINT_STYLE: &str = "\
@page { size: A4; margin: 2.5cm 2cm; }
body { font-family: Georgia, 'Times New Roman', serif; font-size: 11pt; line-height: 1.6; color: #000; }
h1 { font-size: 22pt; text-align: center; margin: 0 0 1.5em 0; page-break-after: avoid; }
p { text-align: justify; margin: 0 0 0.8em 0; orphans: 3; widows: 3; }
@media screen { body { max-width: 21cm; margin: 2em auto; } }";

const PRINT_SCRIPT: &str = "window.addEventListener('load', function () { window.print(); });";

/// Something that can hand a document to the platform's print flow.
pub trait PrintHost {
    /// Open the print flow for `document`.
    fn print(&self, document: &Artifact) -> Result<()>;
}

/// Output of the print renderer.
#[derive(Debug, Clone)]
pub struct PrintJob {
    /// Print-styled HTML that triggers printing when opened.
    pub document: Artifact,
    /// Raw text fallback.
    pub text: Artifact,
    /// Whether a host accepted the print request.
    pub printed: bool,
}

/// Renders extracted content for printing.
#[derive(Debug, Clone, Default)]
pub struct PrintRenderer;

impl PrintRenderer {
    /// Create a new print renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render the print document and the text fallback.
    pub fn render(
        &self,
        book_name: &str,
        content: Option<&ExtractedContent>,
        original_file_name: Option<&str>,
    ) -> Result<PrintJob> {
        let content = require_content(content)?;
        let base = artifact_base_name(book_name, original_file_name);
        let title = escape_markup(content.title_or(book_name)).into_owned();

        let mut html = String::with_capacity(content.text.len() * 2 + 1024);
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", title));
        html.push_str(&format!("<style>\n{}\n</style>\n", PRINT_STYLE));
        html.push_str(&format!("<script>{}</script>\n", PRINT_SCRIPT));
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", title));
        for block in paragraph_blocks(&content.text) {
            html.push_str(&block);
            html.push('\n');
        }
        html.push_str("</body>\n</html>\n");

        let document = Artifact::new(&format!("{}_print", base), "html", HTML_MEDIA_TYPE, html.into_bytes());
        let text = Artifact::new(&base, "txt", TEXT_MEDIA_TYPE, content.text.clone().into_bytes());

        log::info!("Rendered print document and text fallback for '{}'", base);

        Ok(PrintJob {
            document,
            text,
            printed: false,
        })
    }
}

impl PrintJob {
    /// Hand the print document to `host`.
    ///
    /// A host failure is logged and leaves `printed` false; the text
    /// fallback stays available either way.
    pub fn send_to(&mut self, host: &dyn PrintHost) -> bool {
        match host.print(&self.document) {
            Ok(()) => self.printed = true,
            Err(e) => log::warn!(
                "Print request for '{}' failed, text fallback '{}' is still available: {}",
                self.document.file_name,
                self.text.file_name,
                e
            ),
        }
        self.printed
    }
}
