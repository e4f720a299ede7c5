use crate::checkpoint::Checkpoint;
use crate::models::{CrawlPhase, CrawlReport, CrawlState};
use crate::scrapers::page::PageScraper;
use crate::scrapers::pagination::PaginationDiscoverer;
use crate::scrapers::traits::Extractor;
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

pub const DEFAULT_INDEX_URL: &str = "https://www.avito.ru/moskva_i_mo/kvartiry/prodam/vtorichka/big-kitchen-ASgBAgECAkSSA8YQ5geMUgFFrCoVeyJmcm9tIjoxMCwidG8iOm51bGx9?context=&localPriority=0&metro=11";
pub const DEFAULT_BASE_ORIGIN: &str = "https://www.avito.ru";

/// Crawls a paginated Avito search, one page at a time.
///
/// Pages are fetched strictly sequentially to stay under the extraction
/// service's rate limits. A failed page is logged and skipped; the crawl
/// always ends with whatever was collected.
pub struct AvitoCrawler {
    index_url: Url,
    base_origin: Url,
    discoverer: PaginationDiscoverer,
    pages: PageScraper,
    checkpoint: Option<Checkpoint>,
}

impl AvitoCrawler {
    pub fn new(extractor: Arc<dyn Extractor>, index_url: Url, base_origin: Url) -> Self {
        Self {
            index_url,
            base_origin,
            discoverer: PaginationDiscoverer::new(extractor.clone()),
            pages: PageScraper::new(extractor),
            checkpoint: None,
        }
    }

    pub fn with_discoverer(mut self, discoverer: PaginationDiscoverer) -> Self {
        self.discoverer = discoverer;
        self
    }

    pub fn with_page_scraper(mut self, pages: PageScraper) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_checkpoint(mut self, checkpoint: Checkpoint) -> Self {
        self.checkpoint = Some(checkpoint);
        self
    }

    /// Run the whole crawl and return the aggregate
    pub async fn crawl(&self) -> CrawlReport {
        let mut state = self.discover(CrawlState::new()).await;

        let total = state.pages.len();
        for index in 0..total {
            state = self.scrape_step(state, index).await;
        }

        state.phase = CrawlPhase::Done;
        let report = state.finish();
        info!(
            pages = report.pages_total,
            succeeded = report.pages_succeeded,
            failed = report.failed_pages.len(),
            listings = report.listings.len(),
            "Crawl finished"
        );
        report
    }

    async fn discover(&self, mut state: CrawlState) -> CrawlState {
        state.phase = CrawlPhase::Discovering;
        info!(url = %self.index_url, "Discovering pagination");
        state.pages = self.discoverer.discover(&self.index_url, &self.base_origin).await;
        state
    }

    async fn scrape_step(&self, mut state: CrawlState, index: usize) -> CrawlState {
        state.phase = CrawlPhase::Scraping(index);
        let total = state.pages.len();
        let url = state.pages[index].clone();

        match self.pages.scrape_page(url.as_str(), index, total).await {
            Ok(listings) => {
                state = state.record_success(listings);
                self.persist(&state).await;
                info!(
                    page = index + 1,
                    total,
                    listings_so_far = state.listings.len(),
                    "Scraped page"
                );
            }
            Err(e) => {
                warn!(page = index + 1, total, url = %url, error = %e, "Failed to scrape page, skipping");
                state = state.record_failure(url.as_str(), e);
            }
        }

        state
    }

    async fn persist(&self, state: &CrawlState) {
        let Some(checkpoint) = &self.checkpoint else {
            return;
        };
        if let Err(e) = checkpoint.save(&state.listings).await {
            error!(path = %checkpoint.path().display(), error = %e, "Failed to save checkpoint");
        }
    }
}
