//! Sentence-aware chunking of text into length-bounded slides or pages.
//!
//! Text is split into sentence-like units and greedily packed into chunks of
//! at most `max_len` characters. A unit is never split, so a single sentence
//! longer than the budget becomes its own oversized chunk.

use regex::Regex;
use std::sync::LazyLock;

/// A sentence terminator, any closing quotes or brackets, then whitespace.
static SENTENCE_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?]["'\x{201D}\x{2019})\]]*\s+"#).unwrap());

/// Packs text into chunks of roughly `max_len` characters.
#[derive(Debug, Clone)]
pub struct SlidePacker {
    /// Soft upper bound on chunk length, in characters.
    max_len: usize,
}

impl SlidePacker {
    /// Create a packer with the given character budget.
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len: max_len.max(1),
        }
    }

    /// The character budget.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Split text into length-bounded chunks without breaking sentences.
    ///
    /// Never returns an empty vector: empty input comes back as a single
    /// element holding the original text.
    pub fn pack(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut buffer = String::new();
        let mut buffer_len = 0;

        for sentence in split_sentences(text) {
            let sentence_len = sentence.chars().count();
            let joined_len = if buffer.is_empty() {
                sentence_len
            } else {
                buffer_len + 1 + sentence_len
            };

            if joined_len > self.max_len && !buffer.is_empty() {
                chunks.push(std::mem::take(&mut buffer));
                buffer.push_str(sentence);
                buffer_len = sentence_len;
            } else {
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
                buffer.push_str(sentence);
                buffer_len = joined_len;
            }
        }

        if !buffer.is_empty() {
            chunks.push(buffer);
        }

        if chunks.is_empty() {
            return vec![text.to_string()];
        }

        chunks
    }
}

/// Split text into trimmed, non-empty sentence-like units.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY_REGEX.find_iter(text) {
        let sentence = text[start..boundary.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = boundary.end();
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squash(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("One. Two!  Three?\nFour");
        assert_eq!(sentences, vec!["One.", "Two!", "Three?", "Four"]);
    }

    #[test]
    fn test_split_sentences_keeps_closing_quotes() {
        let sentences = split_sentences("He said \"stop.\" Then he left.");
        assert_eq!(sentences, vec!["He said \"stop.\"", "Then he left."]);
    }

    #[test]
    fn test_split_sentences_ignores_decimal_points() {
        let sentences = split_sentences("Pi is 3.14 roughly. Done.");
        assert_eq!(sentences, vec!["Pi is 3.14 roughly.", "Done."]);
    }

    #[test]
    fn test_pack_empty_returns_original() {
        let packer = SlidePacker::new(100);
        assert_eq!(packer.pack(""), vec![String::new()]);
        assert_eq!(packer.pack("   "), vec!["   ".to_string()]);
    }

    #[test]
    fn test_pack_short_text_single_chunk() {
        let packer = SlidePacker::new(100);
        assert_eq!(packer.pack("Hello there. General Kenobi."), vec!["Hello there. General Kenobi."]);
    }

    #[test]
    fn test_pack_flushes_before_overflow() {
        let packer = SlidePacker::new(12);
        let chunks = packer.pack("Aaaa. Bbbb. Cccc. Dddd.");
        assert_eq!(chunks, vec!["Aaaa. Bbbb.", "Cccc. Dddd."]);
    }

    #[test]
    fn test_pack_never_splits_long_sentence() {
        let packer = SlidePacker::new(10);
        let long = "This sentence is far longer than ten characters.";
        let chunks = packer.pack(&format!("Hi. {} Bye.", long));
        assert_eq!(chunks, vec!["Hi.", long, "Bye."]);
    }

    #[test]
    fn test_pack_3500_chars_at_800() {
        // 70 sentences of 49 characters joined by spaces: 3499 characters.
        let sentence = "The quick brown fox jumps over the lazy dog here.";
        assert_eq!(sentence.len(), 49);
        let text = vec![sentence; 70].join(" ");
        assert_eq!(text.len(), 3499);

        let packer = SlidePacker::new(800);
        let chunks = packer.pack(&text);

        assert!(chunks.len() >= 4, "got {} chunks", chunks.len());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 800);
        }
        assert_eq!(squash(&chunks.join(" ")), squash(&text));
    }

    #[test]
    fn test_pack_preserves_all_content() {
        let text = "First line here.\nSecond line follows!  Third?\n\nA new paragraph starts. And ends";
        let packer = SlidePacker::new(25);
        let chunks = packer.pack(text);
        assert_eq!(squash(&chunks.join(" ")), squash(text));
        for chunk in &chunks {
            // Every chunk ends on a sentence boundary or the end of input.
            assert!(
                chunk.ends_with('.') || chunk.ends_with('!') || chunk.ends_with('?') || chunk.ends_with("ends")
            );
        }
    }

    #[test]
    fn test_zero_budget_is_clamped() {
        let packer = SlidePacker::new(0);
        assert_eq!(packer.max_len(), 1);
        assert_eq!(packer.pack("A. B."), vec!["A.", "B."]);
    }
}
