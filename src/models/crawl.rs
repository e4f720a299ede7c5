use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::Listing;

/// Where a crawl currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrawlPhase {
    Idle,
    Discovering,
    Scraping(usize),
    Done,
}

/// A page that was skipped because its extraction failed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailedPage {
    pub url: String,
    pub error: String,
}

/// Listings accumulated across pages, owned by the crawler for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlState {
    pub phase: CrawlPhase,
    pub pages: Vec<Url>,
    pub listings: Vec<Listing>,
    pub pages_succeeded: usize,
    pub failed_pages: Vec<FailedPage>,
    pub started_at: DateTime<Utc>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self {
            phase: CrawlPhase::Idle,
            pages: Vec::new(),
            listings: Vec::new(),
            pages_succeeded: 0,
            failed_pages: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn record_success(mut self, listings: Vec<Listing>) -> Self {
        self.listings.extend(listings);
        self.pages_succeeded += 1;
        self
    }

    pub fn record_failure(mut self, url: &str, error: impl ToString) -> Self {
        self.failed_pages.push(FailedPage { url: url.to_string(), error: error.to_string() });
        self
    }

    pub fn finish(self) -> CrawlReport {
        CrawlReport {
            pages_total: self.pages.len(),
            pages_succeeded: self.pages_succeeded,
            failed_pages: self.failed_pages,
            listings: self.listings,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a finished crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub listings: Vec<Listing>,
    pub pages_total: usize,
    pub pages_succeeded: usize,
    pub failed_pages: Vec<FailedPage>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Pretty-printed listing array, as handed to downstream analysis
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.listings)
    }
}
