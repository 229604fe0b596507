use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::cascade::{Tier, first_non_empty};
use crate::config::{HttpConfig, ProviderConfig, SiteConfig};
use crate::document::{absolutize, first_attr, parse_selector, script_selector};
use crate::embedded::{PAGES_CALL, try_extract_embedded};
use crate::error::Result;
use crate::fetcher::{Fetcher, request_headers};
use crate::logging::Verbosity;
use crate::models::PageRecord;

const IMAGE_ATTRS: [&str; 3] = ["src", "data-src", "data-lazy-src"];
/// Lazy-load stand-ins the site serves before the real image.
const PLACEHOLDER_MARKERS: [&str; 2] = ["loading", "placeholder"];

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s'"<>]+\.(?:jpg|jpeg|png|webp|gif)"#).expect("image url regex")
});

/// Ordered reader images of the chapter at `chapter_id`.
/// Errors are logged and yield an empty list.
pub async fn find_chapter_pages<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &ProviderConfig,
    chapter_id: &str,
    verbosity: Verbosity,
) -> Vec<PageRecord> {
    let span = info_span!("find_chapter_pages", chapter_id);
    async move {
        let headers = request_headers(&config.http, &config.site.site_url);
        let html = match fetcher.fetch_text(chapter_id, headers).await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "failed to load chapter");
                return Vec::new();
            }
        };
        if verbosity.shows_summary() {
            info!(bytes = html.len(), "chapter received");
        }
        match parse_pages(&config.site, &config.http, &html, chapter_id, verbosity) {
            Ok(pages) => {
                if verbosity.shows_summary() {
                    info!(count = pages.len(), "pages found");
                }
                pages
            }
            Err(e) => {
                warn!(error = %e, "page extraction failed");
                Vec::new()
            }
        }
    }
    .instrument(span)
    .await
}

/// Reader images from a chapter page: selectors, then inline script arrays,
/// then any image URL in the raw text. The first tier that finds anything wins.
pub fn parse_pages(
    site: &SiteConfig,
    http: &HttpConfig,
    html: &str,
    chapter_id: &str,
    verbosity: Verbosity,
) -> Result<Vec<PageRecord>> {
    let document = Html::parse_document(html);
    let selector = parse_selector(&site.page_selector)?;

    let urls = first_non_empty(
        verbosity,
        "pages",
        [
            Tier::new("reader-images", || {
                document
                    .select(&selector)
                    .filter_map(|img| first_attr(&img, &IMAGE_ATTRS))
                    .filter(|src| !is_placeholder(src))
                    .map(|src| absolutize(&site.site_url, &src))
                    .collect()
            }),
            Tier::new("embedded-script", || from_scripts(&document)),
            Tier::new("raw-text", || scan_raw_text(html)),
        ],
    );

    let headers = page_headers(http, chapter_id);
    let pages: Vec<PageRecord> = urls
        .into_iter()
        .zip(1u32..)
        .map(|(url, page)| PageRecord {
            url,
            page,
            headers: headers.clone(),
        })
        .collect();
    if verbosity.shows_detail() {
        for p in &pages {
            debug!(page = p.page, url = %p.url, "page");
        }
    }
    Ok(pages)
}

/// Headers the image host expects on every page fetch.
pub fn page_headers(http: &HttpConfig, chapter_id: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Referer".to_string(), chapter_id.to_string()),
        ("User-Agent".to_string(), http.user_agent.clone()),
    ])
}

fn is_placeholder(url: &str) -> bool {
    PLACEHOLDER_MARKERS.iter().any(|m| url.contains(m))
}

fn from_scripts(document: &Html) -> Vec<String> {
    for script in document.select(script_selector()) {
        let content: String = script.text().collect();
        if content.trim().is_empty() {
            continue;
        }
        let urls = match try_extract_embedded(&content, &PAGES_CALL) {
            None => continue,
            Some(Ok(Value::Array(items))) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if s.contains("http") => Some(s.trim().to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>(),
            Some(Ok(_)) => {
                warn!("page literal is not an array");
                continue;
            }
            Some(Err(e)) => {
                warn!(error = %e, "dropping malformed page array");
                continue;
            }
        };
        if !urls.is_empty() {
            return urls;
        }
    }
    Vec::new()
}

fn scan_raw_text(html: &str) -> Vec<String> {
    IMAGE_URL
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|url| !is_placeholder(url))
        .map(str::to_string)
        .collect()
}
