pub mod avito;
pub mod firecrawl;
pub mod jitter;
pub mod page;
pub mod pagination;
pub mod retry;
pub mod traits;
pub mod types;

pub use avito::AvitoCrawler;
pub use firecrawl::FirecrawlExtractor;
pub use jitter::JitterDelay;
pub use page::PageScraper;
pub use pagination::PaginationDiscoverer;
pub use retry::RetryPolicy;
pub use traits::Extractor;
pub use types::{ExtractRequest, PageOptions};
