//! Slide deck rendering.
//!
//! One title slide, then each chapter packed into one or more content
//! slides. Images found on page `i` are laid out on the first slide of
//! chapter `i`.

use crate::artifact::{artifact_base_name, require_content, Artifact};
use crate::pptx::{Align, Anchor, PptxPackage, Rect, Shape, TextBox, SLIDE_HEIGHT, SLIDE_WIDTH};
use ebook_core::{ExtractedContent, ExtractedImage, ImageFormat, Result, SlidePacker};

/// MIME type of a `.pptx` file.
pub const PPTX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Default number of chapters turned into slides.
pub const DEFAULT_MAX_CHAPTERS: usize = 50;

/// Default characters of chapter text per slide.
pub const DEFAULT_SLIDE_CHARS: usize = 800;

/// Most images placed on one slide.
const MAX_IMAGES_PER_SLIDE: usize = 2;

const MARGIN: i64 = 457_200;
const GUTTER: i64 = 228_600;
const CONTENT_WIDTH: i64 = SLIDE_WIDTH - 2 * MARGIN;
const HEADER_TOP: i64 = 228_600;
const HEADER_HEIGHT: i64 = 685_800;
const BODY_TOP: i64 = HEADER_TOP + HEADER_HEIGHT + 152_400;
const FOOTER_HEIGHT: i64 = 304_800;
const FOOTER_TOP: i64 = SLIDE_HEIGHT - FOOTER_HEIGHT - 152_400;
const BODY_BOTTOM: i64 = FOOTER_TOP - 76_200;
const IMAGE_HEIGHT: i64 = 2_743_200;

/// One planned content slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidePlan<'a> {
    /// Zero-based chapter index.
    pub chapter: usize,
    /// Zero-based part within the chapter.
    pub part: usize,
    /// Header text, `Chapter i` or `Chapter i, Part j`.
    pub header: String,
    pub body: String,
    /// Images shown on this slide (first part of a chapter only).
    pub images: Vec<&'a ExtractedImage>,
}

/// Renders extracted content as a `.pptx` slide deck.
#[derive(Debug, Clone)]
pub struct PresentationRenderer {
    max_chapters: usize,
    slide_chars: usize,
}

impl Default for PresentationRenderer {
    fn default() -> Self {
        Self {
            max_chapters: DEFAULT_MAX_CHAPTERS,
            slide_chars: DEFAULT_SLIDE_CHARS,
        }
    }
}

impl PresentationRenderer {
    /// Create a renderer with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many chapters become slides.
    pub fn with_max_chapters(mut self, max: usize) -> Self {
        self.max_chapters = max.max(1);
        self
    }

    /// Set the character budget per content slide.
    pub fn with_slide_chars(mut self, chars: usize) -> Self {
        self.slide_chars = chars.max(1);
        self
    }

    /// Plan the content slides without writing anything.
    pub fn plan<'a>(&self, content: &'a ExtractedContent) -> Vec<SlidePlan<'a>> {
        let packer = SlidePacker::new(self.slide_chars);

        let chapters: Vec<&str> = if content.chapters.is_empty() {
            vec![content.text.as_str()]
        } else {
            content.chapters.iter().map(String::as_str).collect()
        };

        if chapters.len() > self.max_chapters {
            log::info!(
                "Deck limited to the first {} of {} chapters",
                self.max_chapters,
                chapters.len()
            );
        }

        let mut plans = Vec::new();
        for (chapter, text) in chapters.iter().take(self.max_chapters).enumerate() {
            let parts = packer.pack(text);
            let multi_part = parts.len() > 1;
            let images: Vec<&ExtractedImage> = content
                .images_for(chapter)
                .into_iter()
                .take(MAX_IMAGES_PER_SLIDE)
                .collect();

            for (part, body) in parts.into_iter().enumerate() {
                let header = if multi_part {
                    format!("Chapter {}, Part {}", chapter + 1, part + 1)
                } else {
                    format!("Chapter {}", chapter + 1)
                };
                plans.push(SlidePlan {
                    chapter,
                    part,
                    header,
                    body,
                    images: if part == 0 { images.clone() } else { Vec::new() },
                });
            }
        }

        plans
    }

    /// Render the deck.
    pub fn render(
        &self,
        book_name: &str,
        content: Option<&ExtractedContent>,
        original_file_name: Option<&str>,
    ) -> Result<Artifact> {
        let content = require_content(content)?;
        let base = artifact_base_name(book_name, original_file_name);
        let title = content.title_or(book_name);

        let plans = self.plan(content);
        let total = plans.len() + 1;
        let mut package = PptxPackage::new(title);

        package.add_slide(title_slide(title, &footer_text(&base, 1, total)));

        for (idx, plan) in plans.iter().enumerate() {
            let footer = footer_text(&base, idx + 2, total);
            let shapes = content_slide(&mut package, plan, &footer);
            package.add_slide(shapes);
        }

        let slide_count = package.slide_count();
        let bytes = package.finish()?;
        log::info!("Rendered {} slides for '{}' ({} bytes)", slide_count, base, bytes.len());

        Ok(Artifact::new(&base, "pptx", PPTX_MEDIA_TYPE, bytes))
    }
}

/// Small identifier printed on every slide.
fn footer_text(base: &str, slide: usize, total: usize) -> String {
    format!("{} | {}/{}", base, slide, total)
}

fn footer(text: &str) -> Shape {
    Shape::Text(
        TextBox::new("Footer", Rect::new(MARGIN, FOOTER_TOP, CONTENT_WIDTH, FOOTER_HEIGHT), text, 1000)
            .aligned(Align::Right)
            .colored("7F7F7F"),
    )
}

fn title_slide(title: &str, footer_label: &str) -> Vec<Shape> {
    let rect = Rect::new(MARGIN, SLIDE_HEIGHT / 3, CONTENT_WIDTH, SLIDE_HEIGHT / 3);
    vec![
        Shape::Text(
            TextBox::new("Title", rect, title, 4400)
                .bold()
                .aligned(Align::Center)
                .anchored(Anchor::Middle),
        ),
        footer(footer_label),
    ]
}

fn content_slide(package: &mut PptxPackage, plan: &SlidePlan<'_>, footer_label: &str) -> Vec<Shape> {
    let mut shapes = vec![Shape::Text(
        TextBox::new(
            "Header",
            Rect::new(MARGIN, HEADER_TOP, CONTENT_WIDTH, HEADER_HEIGHT),
            &plan.header,
            2800,
        )
        .bold()
        .anchored(Anchor::Middle)
        .colored("1F3864"),
    )];

    let pictures = place_images(package, &plan.images);
    let body_top = if pictures.is_empty() {
        BODY_TOP
    } else {
        BODY_TOP + IMAGE_HEIGHT + GUTTER
    };
    shapes.extend(pictures);

    if !plan.body.trim().is_empty() && body_top < BODY_BOTTOM {
        shapes.push(Shape::Text(TextBox::new(
            "Body",
            Rect::new(MARGIN, body_top, CONTENT_WIDTH, BODY_BOTTOM - body_top),
            &plan.body,
            1800,
        )));
    }

    shapes.push(footer(footer_label));
    shapes
}

/// Lay out one image full width or two side by side. An image that cannot
/// be embedded is skipped with a warning.
fn place_images(package: &mut PptxPackage, images: &[&ExtractedImage]) -> Vec<Shape> {
    let usable: Vec<&ExtractedImage> = images
        .iter()
        .copied()
        .filter(|img| match check_image(img) {
            Ok(()) => true,
            Err(reason) => {
                log::warn!("Skipping image from page {}: {}", img.page_index + 1, reason);
                false
            }
        })
        .collect();

    let slot_width = match usable.len() {
        0 => return Vec::new(),
        1 => CONTENT_WIDTH,
        _ => (CONTENT_WIDTH - GUTTER) / 2,
    };

    usable
        .into_iter()
        .enumerate()
        .map(|(idx, img)| {
            let slot = Rect::new(
                MARGIN + idx as i64 * (slot_width + GUTTER),
                BODY_TOP,
                slot_width,
                IMAGE_HEIGHT,
            );
            let media = package.add_media(img.format, img.data.clone());
            Shape::Picture {
                media,
                rect: slot.fit(img.aspect_ratio()),
            }
        })
        .collect()
}

/// Whether the image bytes match their declared format.
fn check_image(img: &ExtractedImage) -> std::result::Result<(), String> {
    if img.data.is_empty() {
        return Err("no image data".to_string());
    }
    match ImageFormat::from_magic(&img.data) {
        Some(actual) if actual == img.format => Ok(()),
        Some(actual) => Err(format!("declared {:?} but data is {:?}", img.format, actual)),
        None => Err(format!("data is not a {:?} image", img.format)),
    }
}
