pub mod checkpoint;
pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use checkpoint::Checkpoint;
use config::Config;
use models::{CrawlReport, Listing};
use scrapers::{AvitoCrawler, Extractor, FirecrawlExtractor, PageScraper};

/// Where the listings handed to the caller came from
#[derive(Debug, Clone)]
pub enum Acquired {
    /// Read back from an earlier run's output file
    Cached(Vec<Listing>),
    /// Produced by a fresh crawl
    Crawled(CrawlReport),
}

impl Acquired {
    pub fn listings(&self) -> &[Listing] {
        match self {
            Acquired::Cached(listings) => listings,
            Acquired::Crawled(report) => &report.listings,
        }
    }

    pub fn into_listings(self) -> Vec<Listing> {
        match self {
            Acquired::Cached(listings) => listings,
            Acquired::Crawled(report) => report.listings,
        }
    }
}

/// Wire a crawler from the configuration around any extraction backend
pub fn build_crawler(config: &Config, extractor: Arc<dyn Extractor>) -> AvitoCrawler {
    let pages = PageScraper::new(extractor.clone())
        .with_retry(config.retry)
        .with_jitter(config.jitter.clone());

    AvitoCrawler::new(extractor, config.index_url.clone(), config.base_origin.clone())
        .with_page_scraper(pages)
        .with_checkpoint(Checkpoint::new(&config.output))
}

/// Crawl every page of the configured search through Firecrawl
pub async fn scrape_avito(config: &Config) -> Result<CrawlReport> {
    let extractor = FirecrawlExtractor::with_api_url(&config.api_key, config.api_url.as_str())
        .context("Failed to create Firecrawl client")?;
    info!(backend = extractor.backend_name(), "Extraction backend ready");

    Ok(build_crawler(config, Arc::new(extractor)).crawl().await)
}

/// Listings from the output file when it already holds some, otherwise a
/// fresh crawl. `refresh` forces the crawl.
pub async fn load_or_crawl(config: &Config) -> Result<Acquired> {
    let checkpoint = Checkpoint::new(&config.output);

    if !config.refresh {
        if let Some(listings) = checkpoint.load().await? {
            info!(
                path = %checkpoint.path().display(),
                count = listings.len(),
                "Using previously scraped listings"
            );
            return Ok(Acquired::Cached(listings));
        }
        info!("No saved listings found, scraping data...");
    }

    let report = scrape_avito(config).await?;

    // leave the artifact in place even when no page succeeded
    checkpoint.save(&report.listings).await?;
    Ok(Acquired::Crawled(report))
}
