//! Search backend implementations
//!
//! The MCP server talks to search through [`SearchBackend`]; Serper is the
//! only implementation.

use async_trait::async_trait;

use crate::error::ScrapeResult;
use crate::types::SearchQuery;

pub mod serper;

/// A search provider returning its response body untouched
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &str;

    /// Endpoint the backend sends requests to
    fn endpoint(&self) -> &str;

    /// Run one search. No retries.
    async fn search(&self, query: &SearchQuery) -> ScrapeResult<serde_json::Value>;
}
