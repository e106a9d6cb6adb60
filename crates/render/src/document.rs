//! Word-openable document rendering.
//!
//! Output is Office-flavoured HTML saved with a `.doc` extension, which word
//! processors open natively and can re-save in their own formats.

use crate::artifact::{artifact_base_name, require_content, Artifact};
use ebook_core::sanitize::escape_markup;
use ebook_core::segment::split_paragraphs;
use ebook_core::{ExtractedContent, Result};

/// MIME type Word associates with HTML-based `.doc` files.
pub const DOC_MEDIA_TYPE: &str = "application/msword";

const DOCUMENT_STYLE: &str = "\
body { font-family: 'Times New Roman', serif; font-size: 12pt; line-height: 1.5; }
h1 { font-size: 20pt; text-align: center; margin-bottom: 24pt; }
p { margin: 0 0 12pt 0; }";

/// Split text into escaped HTML paragraph blocks.
///
/// Several blank-line-separated paragraphs each become one block, with any
/// single line breaks inside them kept as `<br>`. A lone paragraph is split
/// so that every line becomes its own block.
pub fn paragraph_blocks(text: &str) -> Vec<String> {
    let paragraphs = split_paragraphs(text);

    if paragraphs.len() > 1 {
        paragraphs
            .iter()
            .map(|p| {
                let lines: Vec<String> = p.lines().map(|l| escape_markup(l.trim()).into_owned()).collect();
                format!("<p>{}</p>", lines.join("<br>\n"))
            })
            .collect()
    } else {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| format!("<p>{}</p>", escape_markup(l)))
            .collect()
    }
}

/// Renders extracted content as a `.doc` file.
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer;

impl DocumentRenderer {
    /// Create a new document renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render the document.
    pub fn render(
        &self,
        book_name: &str,
        content: Option<&ExtractedContent>,
        original_file_name: Option<&str>,
    ) -> Result<Artifact> {
        let content = require_content(content)?;
        let base = artifact_base_name(book_name, original_file_name);
        let title = escape_markup(content.title_or(book_name)).into_owned();

        let mut html = String::with_capacity(content.text.len() * 2 + 1024);
        html.push_str(concat!(
            "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" ",
            "xmlns:w=\"urn:schemas-microsoft-com:office:word\" ",
            "xmlns=\"http://www.w3.org/TR/REC-html40\">\n"
        ));
        html.push_str("<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", title));
        html.push_str(concat!(
            "<!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View>",
            "<w:Zoom>100</w:Zoom><w:DoNotOptimizeForBrowser/></w:WordDocument></xml><![endif]-->\n"
        ));
        html.push_str(&format!("<style>\n{}\n</style>\n</head>\n<body>\n", DOCUMENT_STYLE));
        html.push_str(&format!("<h1>{}</h1>\n", title));

        let blocks = paragraph_blocks(&content.text);
        for block in &blocks {
            html.push_str(block);
            html.push('\n');
        }
        html.push_str("</body>\n</html>\n");

        log::info!("Rendered document '{}' with {} blocks", base, blocks.len());

        Ok(Artifact::new(&base, "doc", DOC_MEDIA_TYPE, html.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        let content = ExtractedContent::new(text, vec![text.to_string()]).with_title("T");
        let artifact = DocumentRenderer::new().render("Book", Some(&content), None).unwrap();
        String::from_utf8(artifact.bytes).unwrap()
    }

    #[test]
    fn test_paragraphs_become_blocks() {
        let blocks = paragraph_blocks("One.\n\nTwo.\n\nThree.");
        assert_eq!(blocks, vec!["<p>One.</p>", "<p>Two.</p>", "<p>Three.</p>"]);
    }

    #[test]
    fn test_line_breaks_inside_paragraph_kept() {
        let blocks = paragraph_blocks("Roses are red,\nviolets blue.\n\nEnd.");
        assert_eq!(blocks, vec!["<p>Roses are red,<br>\nviolets blue.</p>", "<p>End.</p>"]);
    }

    #[test]
    fn test_single_paragraph_lines_become_blocks() {
        let blocks = paragraph_blocks("line one\nline two\n\n");
        assert_eq!(blocks, vec!["<p>line one</p>", "<p>line two</p>"]);
    }

    #[test]
    fn test_output_contains_every_escaped_paragraph() {
        let text = "Tom & Jerry.\n\n<script>alert(1)</script>\n\nThe \"end\".";
        let html = render(text);

        for paragraph in text.split("\n\n") {
            assert!(html.contains(escape_markup(paragraph).as_ref()), "missing {}", paragraph);
        }
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_word_markup_and_name() {
        let content = ExtractedContent::new("Body.", vec![]).with_title("A <Title>");
        let artifact = DocumentRenderer::new()
            .render("Book", Some(&content), Some("My Book! (v2).pdf"))
            .unwrap();

        assert_eq!(artifact.file_name, "My_Book_v2.doc");
        assert_eq!(artifact.media_type, DOC_MEDIA_TYPE);

        let html = String::from_utf8(artifact.bytes).unwrap();
        assert!(html.contains("urn:schemas-microsoft-com:office:word"));
        assert!(html.contains("<h1>A &lt;Title&gt;</h1>"));
    }

    #[test]
    fn test_missing_content() {
        assert!(DocumentRenderer::new().render("Book", None, None).is_err());
    }
}
