pub mod coerce;
pub mod crawl;
pub mod schema;

use serde::{Deserialize, Serialize};
use url::Url;

pub use coerce::{coerce, NumberRule};
pub use crawl::{CrawlPhase, CrawlReport, CrawlState, FailedPage};
pub use schema::{ExtractionSchema, FieldKind, FieldSpec, LISTING_SCHEMA, PAGINATION_SCHEMA};

/// One real-estate listing as extracted from a results page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub title: String,
    pub price: f64,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
}

/// A pagination link found at the bottom of the index page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationLink {
    pub link: String,
}

impl PaginationLink {
    /// Resolve the link against the site origin.
    ///
    /// Root-relative, protocol-relative and absolute links all resolve the
    /// way a browser would; a link that cannot be parsed yields `None`.
    pub fn absolute(&self, base_origin: &Url) -> Option<Url> {
        base_origin.join(self.link.trim()).ok()
    }
}
