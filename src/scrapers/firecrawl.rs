use crate::error::ExtractError;
use crate::scrapers::traits::Extractor;
use crate::scrapers::types::ExtractRequest;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.firecrawl.dev";

/// Firecrawl LLM-extraction client
pub struct FirecrawlExtractor {
    client: Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<ScrapeData>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    llm_extraction: Option<Value>,
}

impl FirecrawlExtractor {
    /// Create a client for the public Firecrawl API
    pub fn new(api_key: impl Into<String>) -> Result<Self, ExtractError> {
        Self::with_api_url(api_key, DEFAULT_API_URL)
    }

    /// Create a client against a custom API base (self-hosted or mock server)
    pub fn with_api_url(api_key: impl Into<String>, api_url: impl Into<String>) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .user_agent(concat!("avito-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExtractError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn request_body(request: &ExtractRequest) -> Value {
        let options = &request.options;
        json!({
            "url": request.url,
            "pageOptions": {
                "onlyMainContent": false,
                "waitForSelector": options.wait_for_selector,
                "waitForTimeout": options.wait_for_timeout_ms,
            },
            "extractorOptions": {
                "mode": "llm-extraction",
                "extractionSchema": request.schema,
                "retries": options.service_retries,
            },
            "timeout": options.timeout.as_millis() as u64,
        })
    }
}

#[async_trait]
impl Extractor for FirecrawlExtractor {
    async fn extract(&self, request: &ExtractRequest) -> Result<Value, ExtractError> {
        let endpoint = format!("{}/v0/scrape", self.api_url);
        debug!(url = %request.url, "Requesting extraction");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .timeout(request.options.timeout)
            .json(&Self::request_body(request))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %request.url, "Extraction service is rate limiting");
            return Err(ExtractError::RateLimited(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Http { status: status.as_u16(), body });
        }

        let parsed: ScrapeResponse = response.json().await?;
        if !parsed.success {
            return Err(ExtractError::InvalidPayload(
                parsed.error.unwrap_or_else(|| "success flag not set".to_string()),
            ));
        }

        parsed
            .data
            .and_then(|d| d.llm_extraction)
            .ok_or_else(|| ExtractError::InvalidPayload("no llm_extraction in response".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "Firecrawl"
    }
}
