use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use scanvf_core::config::ProviderConfig;
use scanvf_core::logging::{Verbosity, init_tracing};
use scanvf_core::output;
use scanvf_core::provider::Provider;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "scanvf", version, about = "Search Scan-VF and list chapters and pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (default: <config dir>/scanvf/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the site origin and search endpoint
    #[arg(long, global = true)]
    site_url: Option<String>,

    /// Output format: json or table
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,

    /// Log verbosity: quiet, summary or debug (default: from config)
    #[arg(long, global = true)]
    verbosity: Option<Verbosity>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search the catalog; prompts when the query is omitted
    Search { query: Option<String> },
    /// List the chapters of a catalog entry URL
    Chapters { entry: String },
    /// List the page images of a chapter URL
    Pages { chapter: String },
    /// Print the provider capability descriptor
    Settings,
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scanvf")
        .join("config.toml")
}

fn prompt_query() -> Result<String> {
    if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
        let answer = inquire::Text::new("Search phrase:")
            .with_placeholder("e.g., one piece")
            .prompt();
        return phrase_from_prompt(answer);
    }
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("reading search phrase from stdin")?;
    non_empty_phrase(&line)
}

fn phrase_from_prompt(answer: std::result::Result<String, inquire::InquireError>) -> Result<String> {
    let answer = answer.context("reading search phrase")?;
    non_empty_phrase(&answer)
}

fn non_empty_phrase(raw: &str) -> Result<String> {
    let query = raw.trim();
    if query.is_empty() {
        anyhow::bail!("empty search phrase");
    }
    Ok(query.to_string())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = ProviderConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(url) = cli.site_url.as_deref() {
        config = config.with_site_url(url);
    }
    let verbosity = cli.verbosity.unwrap_or(config.logging.verbosity);
    init_tracing(verbosity);
    // the loader warned before any subscriber existed
    if !config_path.exists() {
        tracing::warn!(
            "Configuration file not found at {:?}, using defaults",
            config_path
        );
    }

    let provider = Provider::new(config)?.with_verbosity(verbosity);

    match cli.command {
        Command::Settings => {
            output::print_pretty_value(&provider.settings());
        }
        Command::Search { query } => {
            let query = match query {
                Some(q) => q,
                None => prompt_query()?,
            };
            let results = provider.search(&query).await;
            match cli.format {
                OutputFormat::Json => output::print_pretty_json(&results),
                OutputFormat::Table => output::print_table(&results),
            }
        }
        Command::Chapters { entry } => {
            let chapters = provider.find_chapters(&entry).await;
            match cli.format {
                OutputFormat::Json => output::print_pretty_json(&chapters),
                OutputFormat::Table => output::print_table(&chapters),
            }
        }
        Command::Pages { chapter } => {
            let pages = provider.find_chapter_pages(&chapter).await;
            match cli.format {
                OutputFormat::Json => output::print_pretty_json(&pages),
                OutputFormat::Table => output::print_table(&pages),
            }
        }
    }
    Ok(())
}
