use crate::chapters::find_chapters;
use crate::config::ProviderConfig;
use crate::error::Result;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::logging::Verbosity;
use crate::models::{ChapterRecord, PageRecord, ProviderSettings, SearchCandidate};
use crate::pages::find_chapter_pages;
use crate::search::search;

/// The three host entry points over one site configuration.
///
/// Holds no state between calls; concurrent calls need no coordination.
pub struct Provider<F: Fetcher = HttpFetcher> {
    config: ProviderConfig,
    fetcher: F,
    verbosity: Verbosity,
}

impl Provider<HttpFetcher> {
    /// Validates `config` and builds the HTTP client from it.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config.http)?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: Fetcher> Provider<F> {
    pub fn with_fetcher(config: ProviderConfig, fetcher: F) -> Self {
        let verbosity = config.logging.verbosity;
        Self {
            config,
            fetcher,
            verbosity,
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn settings(&self) -> ProviderSettings {
        ProviderSettings::default()
    }

    pub async fn search(&self, query: &str) -> Vec<SearchCandidate> {
        search(&self.fetcher, &self.config, query, self.verbosity).await
    }

    /// `entry_id` is the catalog entry URL returned by [`Provider::search`].
    pub async fn find_chapters(&self, entry_id: &str) -> Vec<ChapterRecord> {
        find_chapters(&self.fetcher, &self.config, entry_id, self.verbosity).await
    }

    /// `chapter_id` is a chapter URL returned by [`Provider::find_chapters`].
    pub async fn find_chapter_pages(&self, chapter_id: &str) -> Vec<PageRecord> {
        find_chapter_pages(&self.fetcher, &self.config, chapter_id, self.verbosity).await
    }
}
