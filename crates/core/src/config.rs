use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::document::parse_selector;
use crate::error::{ProviderError, Result};
use crate::logging::Verbosity;

pub const DEFAULT_SITE_URL: &str = "https://www.scan-vf.net";
pub const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Everything the provider needs, loadable from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Where the site lives and how its markup is probed.
///
/// Each selector list is tried as one OR'd group; the order inside a group
/// only matters for document order, not priority.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin prefixed onto relative links to build canonical URLs.
    pub site_url: String,
    pub search_url: String,
    pub query_param: String,
    pub search_selector: String,
    pub search_title_selector: String,
    pub chapter_selector: String,
    pub page_selector: String,
    /// Path fragments that mark a link as a catalog entry in the link-scan fallback.
    pub link_markers: Vec<String>,
    pub result_limit: usize,
    pub min_score: f64,
    /// Queries shorter than this skip score filtering.
    pub short_query_chars: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            search_url: DEFAULT_SITE_URL.to_string(),
            query_param: "s".to_string(),
            search_selector: "article, div.item, div.manga-item, div.bs, div.post, \
                              div[class*='manga'], div[class*='post']"
                .to_string(),
            search_title_selector: "h2, h3, .title, .manga-title".to_string(),
            chapter_selector:
                "ul.chapters li, div.chapter-list a, div.eplister a, li.wp-manga-chapter a"
                    .to_string(),
            page_selector: "div#readerarea img, div.reader-area img, div.chapter-content img, \
                            img.wp-manga-chapter-img"
                .to_string(),
            link_markers: vec!["/manga".into(), "/scan".into(), "/read".into()],
            result_limit: 20,
            min_score: 0.05,
            short_query_chars: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// No timeout when absent; the client default applies.
    pub timeout_seconds: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DESKTOP_USER_AGENT.to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            accept_language: "fr-FR,fr;q=0.9".to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbosity: Verbosity,
}

impl ProviderConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ProviderConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Missing file means defaults; a present but broken file is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("Configuration file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Point both the origin and the search endpoint at `url`.
    pub fn with_site_url(mut self, url: &str) -> Self {
        let url = url.trim_end_matches('/');
        self.site.site_url = url.to_string();
        self.site.search_url = url.to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let site = &self.site;
        if site.site_url.trim().is_empty() {
            return Err(ProviderError::Config("site_url cannot be empty".into()));
        }
        if site.search_url.trim().is_empty() {
            return Err(ProviderError::Config("search_url cannot be empty".into()));
        }
        if site.query_param.trim().is_empty() {
            return Err(ProviderError::Config("query_param cannot be empty".into()));
        }
        if site.result_limit == 0 {
            return Err(ProviderError::Config("result_limit must be greater than 0".into()));
        }
        if !(0.0..=1.0).contains(&site.min_score) {
            return Err(ProviderError::Config(format!(
                "min_score must be within [0, 1], got {}",
                site.min_score
            )));
        }
        for selector in [
            &site.search_selector,
            &site.search_title_selector,
            &site.chapter_selector,
            &site.page_selector,
        ] {
            parse_selector(selector)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        ProviderConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[site]
site_url = "https://mirror.example"
result_limit = 5

[logging]
verbosity = "debug"
"#
        )
        .unwrap();

        let cfg = ProviderConfig::load_from_file(file.path()).unwrap();
        assert_eq!(cfg.site.site_url, "https://mirror.example");
        assert_eq!(cfg.site.result_limit, 5);
        assert_eq!(cfg.site.query_param, "s");
        assert_eq!(cfg.http, HttpConfig::default());
        assert_eq!(cfg.logging.verbosity, Verbosity::Debug);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ProviderConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, ProviderConfig::default());
    }

    #[test]
    fn broken_selector_is_rejected() {
        let mut cfg = ProviderConfig::default();
        cfg.site.page_selector = "div[[".into();
        assert!(matches!(cfg.validate(), Err(ProviderError::Selector { .. })));
    }

    #[test]
    fn out_of_range_min_score_is_rejected() {
        let mut cfg = ProviderConfig::default();
        cfg.site.min_score = 1.5;
        assert!(matches!(cfg.validate(), Err(ProviderError::Config(_))));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site\nsite_url = ").unwrap();
        assert!(matches!(
            ProviderConfig::load_from_file(file.path()),
            Err(ProviderError::ConfigParse(_))
        ));
    }

    #[test]
    fn site_url_override_trims_trailing_slash() {
        let cfg = ProviderConfig::default().with_site_url("http://127.0.0.1:1234/");
        assert_eq!(cfg.site.site_url, "http://127.0.0.1:1234");
        assert_eq!(cfg.site.search_url, "http://127.0.0.1:1234");
    }
}
