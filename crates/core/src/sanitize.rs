//! Output naming and markup escaping shared by every renderer.

use crate::types::file_stem;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Runs of underscores left after replacing unsafe characters.
static UNDERSCORE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Longest base name produced by [`sanitize_file_name`].
pub const MAX_FILE_NAME_LEN: usize = 100;

/// Base name used when nothing survives sanitization.
pub const FALLBACK_FILE_NAME: &str = "ebook";

/// Turn a book or file name into a safe artifact base name.
///
/// Drops the extension, folds accented letters to their base form, replaces
/// anything that is not an ASCII letter or digit with `_`, collapses runs of
/// `_`, trims them from both ends and caps the length.
pub fn sanitize_file_name(name: &str) -> String {
    let stem = if has_known_extension(name) {
        file_stem(name)
    } else {
        name
    };

    let replaced: String = stem
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let collapsed = UNDERSCORE_RUN_REGEX.replace_all(&replaced, "_");
    let mut result: String = collapsed.trim_matches('_').chars().take(MAX_FILE_NAME_LEN).collect();
    while result.ends_with('_') {
        result.pop();
    }

    if result.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        result
    }
}

/// Whether the name ends in an extension this pipeline reads or writes.
fn has_known_extension(name: &str) -> bool {
    const EXTENSIONS: &[&str] = &["pdf", "epub", "mobi", "txt", "pptx", "doc", "html"];
    name.rsplit_once('.')
        .map(|(_, ext)| EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Escape text for embedding in HTML or XML.
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Drop characters XML 1.0 cannot carry (most C0 controls).
pub fn strip_invalid_xml_chars(text: &str) -> Cow<'_, str> {
    let valid = |c: char| matches!(c, '\t' | '\n' | '\r') || c >= ' ';
    if text.chars().all(valid) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| valid(c)).collect())
    }
}

/// Truncate to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("My Book! (v2).pdf"), "My_Book_v2");
        assert_eq!(sanitize_file_name("simple"), "simple");
        assert_eq!(sanitize_file_name("__a   b__"), "a_b");
        assert_eq!(sanitize_file_name("report.final.txt"), "report_final");
    }

    #[test]
    fn test_sanitize_keeps_unknown_extension_text() {
        assert_eq!(sanitize_file_name("Vol. 2"), "Vol_2");
    }

    #[test]
    fn test_sanitize_folds_accents() {
        assert_eq!(sanitize_file_name("Café Crème.epub"), "Cafe_Creme");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_file_name("!!!.pdf"), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name(""), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name("日本語"), FALLBACK_FILE_NAME);
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "a".repeat(300);
        assert_eq!(sanitize_file_name(&long).len(), MAX_FILE_NAME_LEN);

        let with_gap = format!("{} {}", "a".repeat(99), "b".repeat(10));
        assert_eq!(sanitize_file_name(&with_gap), "a".repeat(99));
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup("plain"), "plain");
        assert!(matches!(escape_markup("plain"), Cow::Borrowed(_)));
        assert_eq!(
            escape_markup(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        assert_eq!(strip_invalid_xml_chars("a\u{0}b\u{1F}c\td"), "abc\td");
        assert!(matches!(strip_invalid_xml_chars("fine\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
