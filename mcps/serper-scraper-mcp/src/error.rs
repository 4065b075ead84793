//! Error types for search and scraping

use mcp_common::{internal_error, invalid_params, invalid_request, IntoMcpError, McpError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// A required setting (the Serper API key) is missing. Raised before any I/O.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport failure, non-2xx status, oversized or empty body
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Non-2xx response from the search API
    #[error("Search API error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;

impl IntoMcpError for ScrapeError {
    fn into_mcp_error(self) -> McpError {
        match &self {
            ScrapeError::InvalidRequest(_) => invalid_params(self.to_string()),
            ScrapeError::Configuration(_) => invalid_request(self.to_string()),
            _ => internal_error(self.to_string()),
        }
    }
}
