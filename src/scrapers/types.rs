use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::models::ExtractionSchema;

/// Rendering and timeout options for one kind of extraction call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOptions {
    /// CSS selector to wait for before extracting
    pub wait_for_selector: String,
    /// Settle time after the selector appears (ms)
    pub wait_for_timeout_ms: u64,
    /// Retries performed by the service itself
    pub service_retries: u32,
    /// Overall deadline for the call
    pub timeout: Duration,
}

impl PageOptions {
    /// Options used for listing result pages
    pub fn listings() -> Self {
        Self {
            wait_for_selector: ".items-items-kAJAg".to_string(),
            wait_for_timeout_ms: 5000,
            service_retries: 3,
            timeout: Duration::from_secs(120),
        }
    }

    /// Options used for the pagination bar of the index page
    pub fn pagination() -> Self {
        Self {
            wait_for_selector: ".pagination-root-Ntd_O".to_string(),
            wait_for_timeout_ms: 5000,
            service_retries: 3,
            timeout: Duration::from_secs(120),
        }
    }
}

/// One call to the extraction service
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub url: String,
    pub options: PageOptions,
    pub schema: Value,
}

impl ExtractRequest {
    pub fn new(url: impl Into<String>, schema: &ExtractionSchema, options: &PageOptions) -> Self {
        Self {
            url: url.into(),
            options: options.clone(),
            schema: schema.to_json_schema(),
        }
    }
}
