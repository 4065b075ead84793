//! Library entry point: search, scrape, batch scrape
//!
//! The MCP server is a thin layer over [`ScraperClient`]; hosts that do not
//! speak MCP can use it directly.

use std::sync::Arc;

use crate::backends::{serper::SerperBackend, SearchBackend};
use crate::batch::scrape_batch;
use crate::config::Config;
use crate::error::{ScrapeError, ScrapeResult};
use crate::fetch::Fetcher;
use crate::pipeline::scrape_page;
use crate::types::{BatchPageRequest, PageRequest, PageResult, SearchQuery};

#[derive(Clone)]
pub struct ScraperClient {
    /// The backend, or why search is unavailable
    search: Result<Arc<dyn SearchBackend>, String>,
    fetcher: Fetcher,
    max_concurrency: usize,
}

impl ScraperClient {
    /// Build the client. A missing API key only disables search; scraping
    /// needs no credentials.
    pub fn new(config: &Config) -> ScrapeResult<Self> {
        let search = match SerperBackend::new(config.serper.clone()) {
            Ok(backend) => Ok(Arc::new(backend) as Arc<dyn SearchBackend>),
            Err(ScrapeError::Configuration(reason)) => {
                tracing::warn!("Search disabled: {}", reason);
                Err(reason)
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            search,
            fetcher: Fetcher::new(&config.fetch)?,
            max_concurrency: config.fetch.max_concurrency,
        })
    }

    pub fn search_backend(&self) -> ScrapeResult<&dyn SearchBackend> {
        self.search
            .as_deref()
            .map_err(|reason| ScrapeError::Configuration(reason.clone()))
    }

    /// Google search. Configuration errors surface before any request is made.
    pub async fn search(&self, query: &SearchQuery) -> ScrapeResult<serde_json::Value> {
        let backend = self.search_backend()?;
        tracing::info!(
            backend = backend.name(),
            region = %query.region,
            language = %query.language,
            "Searching for: {}",
            query.query
        );
        backend.search(query).await
    }

    /// Scrape one page. Failures are reported in the result, never returned.
    pub async fn scrape(&self, request: &PageRequest) -> PageResult {
        scrape_page(&self.fetcher, &request.url, request.include_markdown).await
    }

    /// Scrape many pages concurrently, preserving input order. Only an empty
    /// or malformed URL list is an error.
    pub async fn batch_scrape(&self, request: &BatchPageRequest) -> ScrapeResult<Vec<PageResult>> {
        request.validate()?;
        Ok(scrape_batch(
            &self.fetcher,
            &request.urls,
            request.include_markdown,
            self.max_concurrency,
        )
        .await)
    }
}
