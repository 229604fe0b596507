use std::collections::HashSet;

use scraper::{ElementRef, Html};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::{ProviderConfig, SiteConfig};
use crate::document::{
    absolutize, anchor_selector, element_text, first_attr, image_selector, parse_selector,
};
use crate::error::Result;
use crate::fetcher::{Fetcher, request_headers};
use crate::logging::Verbosity;
use crate::models::SearchCandidate;
use crate::normalize::normalize_query;
use crate::scoring::score;

const IMAGE_ATTRS: [&str; 3] = ["src", "data-src", "data-lazy-src"];

pub fn build_search_url(site: &SiteConfig, query: &str) -> String {
    let param = site.query_param.as_str();
    let qs = serde_urlencoded::to_string(&[(param, query)])
        .unwrap_or_else(|_| format!("{}={}", param, query.replace(' ', "+")));
    format!("{}/?{}", site.search_url.trim_end_matches('/'), qs)
}

/// Search the site for `query`. Never fails: any error is logged and
/// turns into an empty list.
pub async fn search<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &ProviderConfig,
    query: &str,
    verbosity: Verbosity,
) -> Vec<SearchCandidate> {
    let span = info_span!("search", query);
    async move {
        match try_search(fetcher, config, query, verbosity).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "search failed");
                Vec::new()
            }
        }
    }
    .instrument(span)
    .await
}

async fn try_search<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &ProviderConfig,
    query: &str,
    verbosity: Verbosity,
) -> Result<Vec<SearchCandidate>> {
    let normalized = normalize_query(query);
    let url = build_search_url(&config.site, &normalized);
    if verbosity.shows_summary() {
        info!(normalized = %normalized, url = %url, "searching");
    }

    let headers = request_headers(&config.http, &config.site.site_url);
    let html = fetcher.fetch_text(&url, headers).await?;
    if verbosity.shows_summary() {
        info!(bytes = html.len(), "search page received");
    }

    let results = parse_search_results(&config.site, &html, &normalized, verbosity)?;
    if verbosity.shows_summary() {
        info!(count = results.len(), "search finished");
    }
    Ok(results)
}

/// Extract, filter and rank candidates from a search results page.
///
/// `query` is the pre-pass output of [`normalize_query`].
pub fn parse_search_results(
    site: &SiteConfig,
    html: &str,
    query: &str,
    verbosity: Verbosity,
) -> Result<Vec<SearchCandidate>> {
    let document = Html::parse_document(html);
    let container_sel = parse_selector(&site.search_selector)?;
    let containers: Vec<ElementRef<'_>> = document.select(&container_sel).collect();
    if verbosity.shows_summary() {
        info!(containers = containers.len(), "structured containers matched");
    }

    // The link scan only runs when no container matched at all; containers
    // that all fail the filter still end the search here.
    let mut results = if containers.is_empty() {
        if verbosity.shows_summary() {
            info!("no containers, scanning every link");
        }
        scan_links(site, &document, verbosity)
    } else {
        let title_sel = parse_selector(&site.search_title_selector)?;
        extract_containers(site, &containers, &title_sel, query, verbosity)
    };

    results.sort_by(|a, b| score(&b.title, query).total_cmp(&score(&a.title, query)));
    results.truncate(site.result_limit);
    Ok(results)
}

fn extract_containers(
    site: &SiteConfig,
    containers: &[ElementRef<'_>],
    title_sel: &scraper::Selector,
    query: &str,
    verbosity: Verbosity,
) -> Vec<SearchCandidate> {
    let accept_all = query.chars().count() < site.short_query_chars;
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for item in containers {
        let anchor = item.select(anchor_selector()).next();
        let title = item
            .select(title_sel)
            .map(|h| element_text(&h))
            .find(|t| !t.is_empty())
            .or_else(|| anchor.as_ref().and_then(|a| first_attr(a, &["title"])))
            .or_else(|| anchor.as_ref().map(element_text).filter(|t| !t.is_empty()));
        let href = anchor.as_ref().and_then(|a| first_attr(a, &["href"]));
        let (Some(title), Some(href)) = (title, href) else {
            continue;
        };

        let relevance = score(&title, query);
        let accepted = relevance > site.min_score || accept_all;
        if verbosity.shows_detail() {
            debug!(title = %title, score = relevance, accepted, "candidate");
        }
        if !accepted {
            continue;
        }

        let url = absolutize(&site.site_url, &href);
        if !seen.insert(url.clone()) {
            continue;
        }
        let image = item
            .select(image_selector())
            .next()
            .and_then(|img| first_attr(&img, &IMAGE_ATTRS))
            .map(|src| absolutize(&site.site_url, &src));

        out.push(SearchCandidate {
            id: url.clone(),
            title,
            url,
            image,
        });
    }
    out
}

fn scan_links(site: &SiteConfig, document: &Html, verbosity: Verbosity) -> Vec<SearchCandidate> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();

    for link in document.select(anchor_selector()) {
        if out.len() >= site.result_limit {
            break;
        }
        let Some(href) = link.value().attr("href").filter(|h| !h.is_empty()) else {
            continue;
        };
        if seen.contains(href) {
            continue;
        }
        if !site.link_markers.iter().any(|m| href.contains(m.as_str())) {
            continue;
        }
        seen.insert(href);

        let title = first_attr(&link, &["title"]).unwrap_or_else(|| element_text(&link));
        if title.chars().count() < 2 {
            continue;
        }

        let url = absolutize(&site.site_url, href);
        if verbosity.shows_detail() {
            debug!(index = out.len(), title = %title, url = %url, "link accepted");
        }
        out.push(SearchCandidate {
            id: url.clone(),
            title,
            url,
            image: None,
        });
    }
    out
}
