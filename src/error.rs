//! Error types for the extraction pipeline.

use thiserror::Error;

/// Failures of a single extraction-service call.
///
/// Rate limiting has its own variant so retry decisions never depend on
/// error text.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// Service rejected the request with HTTP 429
    #[error("rate limited by extraction service (429): {0}")]
    RateLimited(String),

    /// Call did not finish within its deadline
    #[error("extraction call timed out: {0}")]
    Timeout(String),

    /// Any other non-success HTTP status
    #[error("extraction service returned {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Response did not carry the extracted payload
    #[error("invalid extraction payload: {0}")]
    InvalidPayload(String),
}

impl ExtractError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ExtractError::RateLimited(_))
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ExtractError::Timeout(e.to_string())
        } else if e.status().map(|s| s.as_u16()) == Some(429) {
            ExtractError::RateLimited(e.to_string())
        } else if e.is_decode() {
            ExtractError::InvalidPayload(e.to_string())
        } else {
            ExtractError::Network(e.to_string())
        }
    }
}

/// Configuration problems detected before any network activity
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FIRECRAWL_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
