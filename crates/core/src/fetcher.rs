use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};

use crate::config::HttpConfig;
use crate::error::{ProviderError, Result};

/// Outbound GET returning the body text.
///
/// Anything but a 2xx status is an error. There are no retries: a failed
/// fetch just empties that pipeline's result.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &str, headers: HeaderMap) -> Result<String>;
}

pub fn build_http_client(http: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(http.user_agent.clone())
        .gzip(true)
        .brotli(true)
        .pool_idle_timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(2);
    if let Some(secs) = http.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// The fixed header set sent with every page request.
pub fn request_headers(http: &HttpConfig, referer: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in [
        (USER_AGENT, http.user_agent.as_str()),
        (ACCEPT, http.accept.as_str()),
        (ACCEPT_LANGUAGE, http.accept_language.as_str()),
        (REFERER, referer),
    ] {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                headers.insert(name, v);
            }
            Err(_) => tracing::warn!(header = %name, "dropping header with invalid value"),
        }
    }
    headers
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(http)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, headers: HeaderMap) -> Result<String> {
        let resp = self.client.get(url).headers(headers).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text().await?)
    }
}
