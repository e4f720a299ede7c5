use crate::models::{PaginationLink, PAGINATION_SCHEMA};
use crate::scrapers::traits::Extractor;
use crate::scrapers::types::{ExtractRequest, PageOptions};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Finds the page URLs of a paginated listing index.
///
/// Discovery never fails: when the call errors out or finds no links the
/// index page itself is the only page.
pub struct PaginationDiscoverer {
    extractor: Arc<dyn Extractor>,
    options: PageOptions,
}

impl PaginationDiscoverer {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self::with_options(extractor, PageOptions::pagination())
    }

    pub fn with_options(extractor: Arc<dyn Extractor>, options: PageOptions) -> Self {
        Self { extractor, options }
    }

    pub async fn discover(&self, index_url: &Url, base_origin: &Url) -> Vec<Url> {
        let request = ExtractRequest::new(index_url.as_str(), &PAGINATION_SCHEMA, &self.options);

        let links: Vec<PaginationLink> = match self.extractor.extract(&request).await {
            Ok(payload) => {
                info!("Fetched pagination data");
                PAGINATION_SCHEMA.records(&payload)
            }
            Err(e) => {
                warn!(url = %index_url, error = %e, "Failed to fetch pagination");
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        let pages: Vec<Url> = links
            .iter()
            .filter_map(|link| {
                let resolved = link.absolute(base_origin);
                if resolved.is_none() {
                    debug!(link = %link.link, "Skipping unparseable pagination link");
                }
                resolved
            })
            .filter(|url| seen.insert(url.clone()))
            .collect();

        if pages.is_empty() {
            info!("No pagination links found, scraping the index page only");
            return vec![index_url.clone()];
        }

        info!(pages = pages.len(), "Discovered pagination links");
        pages
    }
}
