use thiserror::Error;

/// Failures inside the provider.
///
/// Pipelines never hand these to the host; they are logged where they occur
/// and the entry point degrades to an empty list. Only configuration errors
/// reach the caller.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP status {status} for {url}")]
    Http { status: u16, url: String },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed embedded data: {0}")]
    EmbeddedData(#[from] serde_json::Error),
    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
