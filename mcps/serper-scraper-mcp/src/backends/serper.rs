//! Serper backend
//!
//! Google search through https://serper.dev. The query is POSTed as JSON with
//! the key in `X-API-KEY`; the response JSON is passed through as-is.

use async_trait::async_trait;
use reqwest::Client;

use super::SearchBackend;
use crate::config::{SerperConfig, API_KEY_ENV};
use crate::error::{ScrapeError, ScrapeResult};
use crate::types::SearchQuery;

const API_KEY_HEADER: &str = "X-API-KEY";

pub struct SerperBackend {
    client: Client,
    api_key: String,
    url: String,
}

impl std::fmt::Debug for SerperBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerperBackend")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl SerperBackend {
    /// Fails with [`ScrapeError::Configuration`] when no API key is set.
    /// Nothing is sent over the network here.
    pub fn new(config: SerperConfig) -> ScrapeResult<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ScrapeError::Configuration(format!(
                    "Serper API key is required for search operations (set {API_KEY_ENV})"
                ))
            })?;

        let client = Client::builder()
            .user_agent(concat!("serper-scraper-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            url: config.url,
        })
    }
}

#[async_trait]
impl SearchBackend for SerperBackend {
    fn name(&self) -> &str {
        "serper"
    }

    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn search(&self, query: &SearchQuery) -> ScrapeResult<serde_json::Value> {
        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
