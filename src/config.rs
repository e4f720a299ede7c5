use crate::error::ConfigError;
use crate::scrapers::avito::{DEFAULT_BASE_ORIGIN, DEFAULT_INDEX_URL};
use crate::scrapers::firecrawl::DEFAULT_API_URL;
use crate::scrapers::{JitterDelay, RetryPolicy};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Command-line flags; each has an environment fallback
#[derive(Debug, Clone, Parser)]
#[command(name = "avito-scout", version, about = "Scrape Avito real-estate listings through Firecrawl")]
pub struct Cli {
    /// Firecrawl API key
    #[arg(long, env = "FIRECRAWL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Firecrawl API base URL
    #[arg(long, env = "FIRECRAWL_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Search results page to start from
    #[arg(long, env = "AVITO_INDEX_URL", default_value = DEFAULT_INDEX_URL)]
    pub index_url: String,

    /// Origin that relative pagination links are joined with
    #[arg(long, env = "AVITO_BASE_ORIGIN", default_value = DEFAULT_BASE_ORIGIN)]
    pub base_origin: String,

    /// Checkpoint and output file
    #[arg(short, long, default_value = "avito_listings.json")]
    pub output: PathBuf,

    /// Crawl again even if the output file already holds listings
    #[arg(long)]
    pub refresh: bool,

    /// Attempts per page when rate limited
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// First backoff delay in milliseconds; doubles on each retry
    #[arg(long, default_value_t = 2000)]
    pub base_delay_ms: u64,

    #[arg(long, default_value_t = 1000)]
    pub jitter_min_ms: u64,

    #[arg(long, default_value_t = 3000)]
    pub jitter_max_ms: u64,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: Url,
    pub index_url: Url,
    pub base_origin: Url,
    pub output: PathBuf,
    pub refresh: bool,
    pub retry: RetryPolicy,
    pub jitter: JitterDelay,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let api_url = parse_http_url("api_url", &cli.api_url)?;
        let index_url = parse_http_url("index_url", &cli.index_url)?;
        let base_origin = parse_http_url("base_origin", &cli.base_origin)?;

        if cli.max_attempts == 0 {
            return Err(ConfigError::Invalid { field: "max_attempts", reason: "must be at least 1".to_string() });
        }

        if cli.jitter_min_ms > cli.jitter_max_ms {
            return Err(ConfigError::Invalid {
                field: "jitter_min_ms",
                reason: format!("{} is above jitter_max_ms {}", cli.jitter_min_ms, cli.jitter_max_ms),
            });
        }

        Ok(Self {
            api_key,
            api_url,
            index_url,
            base_origin,
            output: cli.output,
            refresh: cli.refresh,
            retry: RetryPolicy::new(cli.max_attempts, Duration::from_millis(cli.base_delay_ms)),
            jitter: JitterDelay::new(cli.jitter_min_ms..cli.jitter_max_ms),
        })
    }
}

fn parse_http_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::Invalid { field, reason: format!("{}: {}", e, value) })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid { field, reason: format!("unsupported scheme {}: {}", other, value) }),
    }
}
