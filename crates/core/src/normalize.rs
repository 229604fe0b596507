use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static ORDINAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+)(?:st|nd|rd|th)\b").expect("ordinal suffix regex")
});

/// Matching key: lowercase, accents removed, every run outside `[a-z0-9]`
/// folded to one space, trimmed.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for ch in input.to_lowercase().nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Pre-pass over the user's search string: `2nd` becomes `2`, whitespace
/// runs collapse to one space.
pub fn normalize_query(input: &str) -> String {
    ORDINAL_SUFFIX
        .replace_all(input, "$1")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// Combining Diacritical Marks block.
fn is_combining_mark(ch: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&ch)
}
