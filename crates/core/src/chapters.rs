use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::cascade::{Tier, first_non_empty};
use crate::config::{ProviderConfig, SiteConfig};
use crate::document::{absolutize, anchor_of, element_text, first_attr, parse_selector, script_selector};
use crate::embedded::{CHAPTERS_LITERAL, try_extract_embedded};
use crate::error::{ProviderError, Result};
use crate::fetcher::{Fetcher, request_headers};
use crate::logging::Verbosity;
use crate::models::ChapterRecord;

static TEXT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:chapitre|chapter|ch\.?)\s*(\d+(?:\.\d+)?)").expect("chapter text regex")
});
static HREF_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)chapter[-_](\d+(?:\.\d+)?)").expect("chapter href regex")
});

/// Shape of one entry in an inline `chapters` literal.
#[derive(Debug, Deserialize)]
struct EmbeddedChapter {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    number: Option<Value>,
    #[serde(default)]
    chapter: Option<Value>,
    #[serde(default)]
    title: Option<String>,
}

/// Chapter list of the catalog entry at `entry_id`, ascending by number.
/// Errors are logged and yield an empty list.
pub async fn find_chapters<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &ProviderConfig,
    entry_id: &str,
    verbosity: Verbosity,
) -> Vec<ChapterRecord> {
    let span = info_span!("find_chapters", entry_id);
    async move {
        let headers = request_headers(&config.http, &config.site.site_url);
        let html = match fetcher.fetch_text(entry_id, headers).await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "failed to load catalog entry");
                return Vec::new();
            }
        };
        if verbosity.shows_summary() {
            info!(bytes = html.len(), "catalog entry received");
        }
        match parse_chapters(&config.site, &html, entry_id, verbosity) {
            Ok(chapters) => {
                if verbosity.shows_summary() {
                    info!(count = chapters.len(), "chapters found");
                }
                chapters
            }
            Err(e) => {
                warn!(error = %e, "chapter extraction failed");
                Vec::new()
            }
        }
    }
    .instrument(span)
    .await
}

pub fn parse_chapters(
    site: &SiteConfig,
    html: &str,
    entry_id: &str,
    verbosity: Verbosity,
) -> Result<Vec<ChapterRecord>> {
    let document = Html::parse_document(html);
    let selector = parse_selector(&site.chapter_selector)?;

    let records = first_non_empty(
        verbosity,
        "chapters",
        [
            Tier::new("chapter-list", || {
                from_chapter_list(site, &document, &selector, verbosity)
            }),
            Tier::new("embedded-script", || {
                from_scripts(site, &document, entry_id, verbosity)
            }),
        ],
    );
    Ok(dedup_and_sort(records))
}

/// One record per distinct number, the last one seen winning, ascending.
pub fn dedup_and_sort(records: Vec<ChapterRecord>) -> Vec<ChapterRecord> {
    let mut by_number: HashMap<u64, ChapterRecord> = HashMap::new();
    for record in records {
        by_number.insert(number_key(record.number), record);
    }
    let mut unique: Vec<ChapterRecord> = by_number.into_values().collect();
    unique.sort_by(|a, b| a.number.total_cmp(&b.number));
    unique
}

// -0.0 and 0.0 are the same chapter.
fn number_key(n: f64) -> u64 {
    if n == 0.0 { 0.0f64.to_bits() } else { n.to_bits() }
}

fn from_chapter_list(
    site: &SiteConfig,
    document: &Html,
    selector: &scraper::Selector,
    verbosity: Verbosity,
) -> Vec<ChapterRecord> {
    let mut out: Vec<ChapterRecord> = Vec::new();
    for el in document.select(selector) {
        let Some(link) = anchor_of(el) else { continue };
        let Some(href) = first_attr(&link, &["href"]) else {
            continue;
        };
        let mut text = element_text(&link);
        if text.is_empty() {
            text = element_text(&el);
        }

        let number = capture_number(&TEXT_NUMBER, &text)
            .or_else(|| capture_number(&HREF_NUMBER, &href))
            .unwrap_or((out.len() + 1) as f64);
        let url = absolutize(&site.site_url, &href);
        let title = if text.is_empty() {
            default_title(number)
        } else {
            text
        };
        if verbosity.shows_detail() {
            debug!(number, title = %title, url = %url, "chapter link");
        }
        out.push(ChapterRecord {
            id: url.clone(),
            number,
            title,
            url,
        });
    }
    out
}

fn from_scripts(
    site: &SiteConfig,
    document: &Html,
    entry_id: &str,
    verbosity: Verbosity,
) -> Vec<ChapterRecord> {
    let mut out = Vec::new();
    for script in document.select(script_selector()) {
        let content: String = script.text().collect();
        if !content.contains("chapter") {
            continue;
        }
        let parsed = match try_extract_embedded(&content, &CHAPTERS_LITERAL) {
            None => continue,
            Some(parsed) => parsed,
        };
        match parsed
            .map_err(ProviderError::from)
            .and_then(|value| embedded_records(site, value, entry_id))
        {
            Ok(records) => {
                if verbosity.shows_detail() {
                    debug!(count = records.len(), "chapters recovered from script");
                }
                out.extend(records);
            }
            Err(e) => warn!(error = %e, "dropping malformed chapters literal"),
        }
    }
    out
}

/// Map a parsed literal to records; any bad entry rejects the whole block.
fn embedded_records(site: &SiteConfig, value: Value, entry_id: &str) -> Result<Vec<ChapterRecord>> {
    let entries: Vec<EmbeddedChapter> = serde_json::from_value(value)?;
    entries
        .into_iter()
        .map(|entry| {
            let number = entry
                .number
                .as_ref()
                .and_then(value_number)
                .or_else(|| entry.chapter.as_ref().and_then(value_number))
                .ok_or_else(|| {
                    ProviderError::EmbeddedData(serde::de::Error::custom(
                        "chapter entry without a usable number",
                    ))
                })?;
            let url = match entry.url.as_deref().map(str::trim) {
                Some(u) if !u.is_empty() => absolutize(&site.site_url, u),
                _ => format!("{}/chapter-{}", entry_id.trim_end_matches('/'), number),
            };
            let title = entry
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| default_title(number));
            Ok(ChapterRecord {
                id: url.clone(),
                number,
                title,
                url,
            })
        })
        .collect()
}

fn value_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn capture_number(re: &Regex, haystack: &str) -> Option<f64> {
    re.captures(haystack)?.get(1)?.as_str().parse().ok()
}

fn default_title(number: f64) -> String {
    format!("Chapitre {number}")
}
