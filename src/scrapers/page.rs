use crate::error::ExtractError;
use crate::models::{Listing, LISTING_SCHEMA};
use crate::scrapers::jitter::JitterDelay;
use crate::scrapers::retry::RetryPolicy;
use crate::scrapers::traits::Extractor;
use crate::scrapers::types::{ExtractRequest, PageOptions};
use std::sync::Arc;
use tracing::{debug, info};

/// Extracts the listings of a single results page
pub struct PageScraper {
    extractor: Arc<dyn Extractor>,
    options: PageOptions,
    retry: RetryPolicy,
    jitter: JitterDelay,
}

impl PageScraper {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            options: PageOptions::listings(),
            retry: RetryPolicy::default(),
            jitter: JitterDelay::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_jitter(mut self, jitter: JitterDelay) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_options(mut self, options: PageOptions) -> Self {
        self.options = options;
        self
    }

    /// Scrape one page. Rate limits are retried with backoff; any other
    /// failure is returned to the caller.
    pub async fn scrape_page(
        &self,
        url: &str,
        page_index: usize,
        total_pages: usize,
    ) -> Result<Vec<Listing>, ExtractError> {
        info!(page = page_index + 1, total = total_pages, "Scraping page");

        self.jitter.wait().await;

        let request = ExtractRequest::new(url, &LISTING_SCHEMA, &self.options);
        let payload = self.retry.run(|| self.extractor.extract(&request)).await?;

        let listings: Vec<Listing> = LISTING_SCHEMA.records(&payload);
        debug!(url = %url, count = listings.len(), "Extracted listings");
        Ok(listings)
    }
}
