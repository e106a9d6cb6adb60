//! Heuristic chapter segmentation.
//!
//! Boundary patterns are tried in priority order and the first one that
//! yields at least two chapters wins. Without a usable pattern the text is
//! split on blank lines, and failing that it is packed into fixed-size
//! chunks so a long unstructured text never becomes a single chapter.
//!
//! There is no grammar behind these patterns. A sentence of ordinary prose
//! that happens to start with "Chapter 3" is treated as a boundary.

use crate::packer::SlidePacker;
use regex::Regex;
use std::sync::LazyLock;

/// Heading markers, highest priority first. Capture group 1 is the marker
/// itself; a chapter starts where it starts.
///
/// Chapter headings are also recognised straight after a sentence end, since
/// PDF pages flatten into a single line. The other markers need a line start.
static BOUNDARY_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        (
            "chapter",
            Regex::new(
                r#"(?m)(?:^[ \t]*|[.!?]["'\x{201D}\x{2019})\]]*[ \t]+)((?:Chapter|CHAPTER|Ch\.)[ \t]*\d+)"#,
            )
            .unwrap(),
        ),
        ("numbered", Regex::new(r"(?m)^[ \t]*(\d+\.[ \t]+\S)").unwrap()),
        ("markdown", Regex::new(r"(?m)^[ \t]*(#{1,3}[ \t]+\S)").unwrap()),
        (
            "roman",
            Regex::new(r"(?m)^[ \t]*([IVXLCDM]+\.[ \t]+\S)").unwrap(),
        ),
    ]
});

/// One or more blank lines.
static PARAGRAPH_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").unwrap());

/// Default character budget for the length-based fallback.
pub const DEFAULT_FALLBACK_CHARS: usize = 2000;

/// Default paragraph count the blank-line fallback must exceed.
pub const DEFAULT_MIN_PARAGRAPHS: usize = 3;

/// Splits raw text into an ordered sequence of chapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSegmenter {
    /// Chunk budget when no structure is found.
    fallback_chars: usize,

    /// The paragraph fallback needs strictly more paragraphs than this.
    min_paragraphs: usize,
}

impl Default for ChapterSegmenter {
    fn default() -> Self {
        Self {
            fallback_chars: DEFAULT_FALLBACK_CHARS,
            min_paragraphs: DEFAULT_MIN_PARAGRAPHS,
        }
    }
}

impl ChapterSegmenter {
    /// Create a segmenter with the default budgets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk budget for unstructured text.
    pub fn with_fallback_chars(mut self, chars: usize) -> Self {
        self.fallback_chars = chars.max(1);
        self
    }

    /// Set the paragraph count the blank-line fallback must exceed.
    pub fn with_min_paragraphs(mut self, paragraphs: usize) -> Self {
        self.min_paragraphs = paragraphs;
        self
    }

    /// Partition text into chapters.
    ///
    /// Never returns an empty vector. Blank input comes back unchanged as a
    /// single chapter through the length fallback.
    pub fn segment(&self, text: &str) -> Vec<String> {
        for (name, pattern) in BOUNDARY_PATTERNS.iter() {
            let chapters = split_on_markers(text, pattern);
            if chapters.len() >= 2 {
                log::debug!("Segmented {} chapters using {} headings", chapters.len(), name);
                return chapters;
            }
        }

        let paragraphs = split_paragraphs(text);
        if paragraphs.len() > self.min_paragraphs {
            log::debug!("Segmented {} chapters from paragraphs", paragraphs.len());
            return paragraphs.into_iter().map(str::to_string).collect();
        }

        let chunks = SlidePacker::new(self.fallback_chars).pack(text);
        log::debug!("Segmented {} chapters by length", chunks.len());
        chunks
    }
}

/// Cut text at every marker match, keeping each marker at the start of the
/// chapter it introduces and any text before the first marker as its own
/// leading chapter.
fn split_on_markers(text: &str, pattern: &Regex) -> Vec<String> {
    let mut starts: Vec<usize> = pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.start())
        .collect();
    if starts.is_empty() {
        return Vec::new();
    }
    if starts[0] != 0 {
        starts.insert(0, 0);
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            text[start..end].trim()
        })
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split text on blank lines into trimmed, non-empty paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK_REGEX
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squash(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_chapter_headings() {
        let text = "Chapter 1\nHello world.\n\nChapter 2\nGoodbye.";
        let chapters = ChapterSegmenter::new().segment(text);

        assert_eq!(chapters.len(), 2);
        assert!(chapters[0].starts_with("Chapter 1"));
        assert!(chapters[1].starts_with("Chapter 2"));
        assert_eq!(chapters[0], "Chapter 1\nHello world.");
        assert_eq!(chapters[1], "Chapter 2\nGoodbye.");
    }

    #[test]
    fn test_chapter_heading_variants() {
        let text = "CHAPTER 1 The Start\nText.\nCh. 2 Middle\nMore.\nChapter 3\nEnd.";
        let chapters = ChapterSegmenter::new().segment(text);

        assert_eq!(chapters.len(), 3);
        assert!(chapters[0].starts_with("CHAPTER 1"));
        assert!(chapters[1].starts_with("Ch. 2"));
        assert!(chapters[2].starts_with("Chapter 3"));
    }

    #[test]
    fn test_preamble_kept_as_leading_chapter() {
        let text = "Foreword text.\n\nChapter 1\nBody one.\n\nChapter 2\nBody two.";
        let chapters = ChapterSegmenter::new().segment(text);

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0], "Foreword text.");
        assert!(chapters[1].starts_with("Chapter 1"));
    }

    #[test]
    fn test_single_marker_with_preamble_counts() {
        let text = "Preface.\nChapter 1\nThe only chapter.";
        let chapters = ChapterSegmenter::new().segment(text);
        assert_eq!(chapters, vec!["Preface.", "Chapter 1\nThe only chapter."]);
    }

    #[test]
    fn test_numbered_headings() {
        let text = "1. Beginnings\nSome text.\n\n2. Endings\nMore text.";
        let chapters = ChapterSegmenter::new().segment(text);

        assert_eq!(chapters.len(), 2);
        assert!(chapters[0].starts_with("1. Beginnings"));
        assert!(chapters[1].starts_with("2. Endings"));
    }

    #[test]
    fn test_markdown_headings() {
        let text = "# Part One\nalpha\n## Part Two\nbeta\n#### not a heading\ngamma";
        let chapters = ChapterSegmenter::new().segment(text);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0], "# Part One\nalpha");
        assert_eq!(chapters[1], "## Part Two\nbeta\n#### not a heading\ngamma");
    }

    #[test]
    fn test_roman_headings() {
        let text = "I. Loomings\nCall me Ishmael.\nII. The Carpet-Bag\nI stuffed a shirt.";
        let chapters = ChapterSegmenter::new().segment(text);

        assert_eq!(chapters.len(), 2);
        assert!(chapters[0].starts_with("I. Loomings"));
        assert!(chapters[1].starts_with("II. The Carpet-Bag"));
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        // Both chapter and markdown headings are present; chapter headings
        // have priority even though markdown would give more chapters.
        let text = "# A\nx\n# B\ny\nChapter 1\nz\n# C\nw\nChapter 2\nv";
        let chapters = ChapterSegmenter::new().segment(text);

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0], "# A\nx\n# B\ny");
        assert_eq!(chapters[1], "Chapter 1\nz\n# C\nw");
        assert_eq!(chapters[2], "Chapter 2\nv");
    }

    #[test]
    fn test_paragraph_fallback() {
        let text = "Para one.\n\nPara two.\n\nPara three.\n\nPara four.\n\nPara five.";
        let chapters = ChapterSegmenter::new().segment(text);

        assert_eq!(chapters.len(), 5);
        assert_eq!(chapters[4], "Para five.");
    }

    #[test]
    fn test_few_paragraphs_fall_through_to_length() {
        let text = "Para one.\n\nPara two.\n\nPara three.";
        let chapters = ChapterSegmenter::new().segment(text);
        assert_eq!(chapters, vec!["Para one. Para two. Para three."]);
    }

    #[test]
    fn test_length_fallback_bounds_long_text() {
        let text = "Plain words go on and on without any structure at all. ".repeat(100);
        let chapters = ChapterSegmenter::new().segment(&text);

        assert!(chapters.len() >= 3);
        for chapter in &chapters {
            assert!(chapter.chars().count() <= DEFAULT_FALLBACK_CHARS);
        }
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(ChapterSegmenter::new().segment(""), vec![""]);
        assert_eq!(ChapterSegmenter::new().segment("  "), vec!["  "]);
        assert_eq!(ChapterSegmenter::new().segment(" \n\n "), vec![" \n\n "]);
    }

    #[test]
    fn test_chapter_headings_inside_flattened_page() {
        let text = "Preface words. Chapter 1 Hello world. Chapter 2 Goodbye now.";
        let chapters = ChapterSegmenter::new().segment(text);

        assert_eq!(
            chapters,
            vec!["Preface words.", "Chapter 1 Hello world.", "Chapter 2 Goodbye now."]
        );
    }

    #[test]
    fn test_chapter_reference_mid_sentence_is_not_a_heading() {
        let text = "See Chapter 3 for details. It explains Chapter 4 too.";
        let chapters = ChapterSegmenter::new().segment(text);
        assert_eq!(chapters, vec![text]);
    }

    #[test]
    fn test_custom_fallback_budgets() {
        let text = "One. Two. Three.\n\nFour. Five.\n\nSix.";

        let by_paragraph = ChapterSegmenter::new().with_min_paragraphs(2).segment(text);
        assert_eq!(by_paragraph, vec!["One. Two. Three.", "Four. Five.", "Six."]);

        let by_length = ChapterSegmenter::new().with_fallback_chars(10).segment(text);
        assert_eq!(by_length, vec!["One. Two.", "Three.", "Four.", "Five. Six."]);
    }

    #[test]
    fn test_segments_reproduce_text() {
        let samples = [
            "Chapter 1\nHello world.\n\nChapter 2\nGoodbye.",
            "Intro\n\n# One\nalpha beta\n\n# Two\ngamma",
            "a\n\nb\n\nc\n\nd\n\ne\n\nf",
            "Just one short paragraph with no structure.",
            "First.\n\nSecond.",
            "Preface words. Chapter 1 Hello world. Chapter 2 Goodbye now.",
        ];

        for text in samples {
            let chapters = ChapterSegmenter::new().segment(text);
            assert!(!chapters.is_empty(), "no chapters for {:?}", text);
            assert_eq!(squash(&chapters.join(" ")), squash(text), "mismatch for {:?}", text);
        }
    }

    #[test]
    fn test_split_paragraphs() {
        assert_eq!(split_paragraphs("a\n\nb\n   \n\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_paragraphs("a\nb"), vec!["a\nb"]);
        assert!(split_paragraphs("").is_empty());
    }
}
