//! Small helpers over `scraper` shared by the three pipelines.

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use crate::error::{ProviderError, Result};

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("anchor selector"));
static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("image selector"));
static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("script selector"));

/// Parse a CSS selector list without panicking.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ProviderError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

pub fn anchor_selector() -> &'static Selector {
    &ANCHOR
}

pub fn image_selector() -> &'static Selector {
    &IMAGE
}

pub fn script_selector() -> &'static Selector {
    &SCRIPT
}

/// Text content of `el` with whitespace runs collapsed to single spaces.
pub fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First of `attrs` that is present and non-blank, trimmed.
pub fn first_attr(el: &ElementRef<'_>, attrs: &[&str]) -> Option<String> {
    attrs
        .iter()
        .filter_map(|name| el.value().attr(name))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// The link a matched element stands for: itself when it is an `<a>`,
/// otherwise its first descendant anchor.
pub fn anchor_of<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    if el.value().name() == "a" {
        Some(el)
    } else {
        el.select(anchor_selector()).next()
    }
}

/// Canonical URL for `href` on the site at `origin`.
pub fn absolutize(origin: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{rest}");
    }
    let base = origin.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{}/{}", base, href.trim_start_matches("./"))
    }
}
