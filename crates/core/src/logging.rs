use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// How much each pipeline run reports.
///
/// Passed into every pipeline call rather than read from a global.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Failures only.
    Quiet,
    /// Tier yields and totals.
    #[default]
    Summary,
    /// Every candidate, score and page URL.
    Debug,
}

impl Verbosity {
    pub fn shows_summary(self) -> bool {
        self >= Verbosity::Summary
    }

    pub fn shows_detail(self) -> bool {
        self >= Verbosity::Debug
    }

    /// Default `EnvFilter` directive for this level.
    pub fn filter_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Summary => "scanvf_core=info,scanvf=info,warn",
            Verbosity::Debug => "scanvf_core=debug,scanvf=debug,info",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verbosity::Quiet => write!(f, "quiet"),
            Verbosity::Summary => write!(f, "summary"),
            Verbosity::Debug => write!(f, "debug"),
        }
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" => Ok(Verbosity::Quiet),
            "summary" => Ok(Verbosity::Summary),
            "debug" => Ok(Verbosity::Debug),
            other => Err(format!(
                "unknown verbosity '{other}' (expected quiet, summary or debug)"
            )),
        }
    }
}

/// Install a fmt subscriber on stderr. `RUST_LOG` wins over `verbosity`.
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init_tracing(verbosity: Verbosity) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| verbosity.filter_directive().into());
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if installed && verbosity.shows_detail() {
        info!(%verbosity, "Tracing initialized");
    }
}
