use crate::error::ExtractError;
use crate::scrapers::types::ExtractRequest;
use async_trait::async_trait;
use serde_json::Value;

/// Common trait for schema-driven extraction services.
/// The pipeline only sees this seam, so the backend can be swapped or faked.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Fetch and render `request.url`, returning the schema-shaped payload
    async fn extract(&self, request: &ExtractRequest) -> Result<Value, ExtractError>;

    /// Get the name of the extraction backend
    fn backend_name(&self) -> &'static str;
}
