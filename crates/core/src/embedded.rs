//! Best-effort recovery of JSON literals embedded in inline scripts.
//!
//! The patterns are narrow and brittle; pipelines only see
//! [`try_extract_embedded`], so a pattern can change without touching them.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// `chapters = [...]` or `chapters: [...]`.
pub static CHAPTERS_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)chapters\s*[:=]\s*(\[.*?\])").expect("chapters literal regex")
});

/// `pages([...])`, `images([...])` or `ts_reader.run([...])`.
pub static PAGES_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(?:pages|images|ts_reader\.run)\s*\(\s*(\[.*?\])\s*\)")
        .expect("pages call regex")
});

/// `None` when `pattern` does not occur in `text`; otherwise the parse of
/// its first capture group.
pub fn try_extract_embedded(
    text: &str,
    pattern: &Regex,
) -> Option<Result<Value, serde_json::Error>> {
    let literal = pattern.captures(text)?.get(1)?.as_str();
    Some(serde_json::from_str(literal))
}
