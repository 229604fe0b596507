//! Catalog extraction for the Scan-VF manga site.
//!
//! The site exposes no API, so every extraction is an ordered cascade of
//! selector, embedded-script and raw-text strategies. See [`provider::Provider`]
//! for the three host entry points.

pub mod cascade;
pub mod chapters;
pub mod config;
pub mod document;
pub mod embedded;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod output;
pub mod pages;
pub mod provider;
pub mod scoring;
pub mod search;

pub use error::ProviderError;
pub use models::{ChapterRecord, PageRecord, ProviderSettings, SearchCandidate};
pub use provider::Provider;
