//! MCP Server implementation for search and scraping
//!
//! Exposes [`ScraperClient`] as four tools: `google_search`, `scrape`,
//! `batch_scrape` and `get_config`.

use mcp_common::{
    async_trait, json_success, CallToolResult, EmbeddableError, EmbeddableMcp, EmbeddableResult,
    McpError, ResultExt, Tool,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use serde_json::Value;

use crate::client::ScraperClient;
use crate::config::Config;
use crate::error::ScrapeResult;
use crate::types::{BatchPageRequest, PageRequest, SearchQuery};

const DESCRIPTION: &str = "Serper Scraper MCP Server - Google search through the Serper API \
     and web page scraping. Scrape results include title, visible text, optional markdown, \
     meta tags and JSON-LD. Batch scrapes run concurrently and keep input order; per-URL \
     failures are reported in each result's `error` field.";

/// The Serper Scraper MCP Server
#[derive(Clone)]
pub struct SerperScraperMcpServer {
    client: ScraperClient,
    config: Config,
    tool_router: ToolRouter<Self>,
}

/// Reported by `get_config`; never includes the API key
#[derive(Debug, Serialize)]
struct ConfigStatus {
    search_available: bool,
    search_backend: Option<String>,
    search_endpoint: String,
    timeout_seconds: u64,
    max_redirects: usize,
    max_response_size: usize,
    max_concurrency: usize,
    user_agent: String,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl SerperScraperMcpServer {
    pub fn new(config: Config) -> ScrapeResult<Self> {
        let client = ScraperClient::new(&config)?;

        Ok(Self {
            client,
            config,
            tool_router: Self::tool_router(),
        })
    }

    /// Load config from the environment and standard locations
    pub fn load() -> anyhow::Result<Self> {
        let config = Config::load()?;
        tracing::info!("Search endpoint: {}", config.serper.url);
        Ok(Self::new(config)?)
    }

    #[tool(
        description = "Search Google through the Serper API. Requires q (query), gl (region, e.g. 'us') and hl (language, e.g. 'en'). Returns the raw Serper response."
    )]
    async fn google_search(
        &self,
        Parameters(query): Parameters<SearchQuery>,
    ) -> Result<CallToolResult, McpError> {
        let response = self.client.search(&query).await.to_mcp_err()?;
        json_success(&response)
    }

    #[tool(
        description = "Scrape a single URL. Returns title, text, meta tags, JSON-LD, raw HTML and optionally markdown. Failures are reported in the result's error field."
    )]
    async fn scrape(
        &self,
        Parameters(request): Parameters<PageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.client.scrape(&request).await;
        json_success(&result)
    }

    #[tool(
        description = "Scrape multiple URLs in parallel. Returns one result per URL in the same order; a failing URL does not affect the others."
    )]
    async fn batch_scrape(
        &self,
        Parameters(request): Parameters<BatchPageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let results = self.client.batch_scrape(&request).await.to_mcp_err()?;
        json_success(&results)
    }

    #[tool(description = "Get the current search and fetch configuration.")]
    async fn get_config(&self) -> Result<CallToolResult, McpError> {
        let backend = self.client.search_backend().ok();
        let fetch = &self.config.fetch;

        let status = ConfigStatus {
            search_available: backend.is_some(),
            search_backend: backend.map(|b| b.name().to_string()),
            search_endpoint: backend
                .map_or_else(|| self.config.serper.url.clone(), |b| b.endpoint().to_string()),
            timeout_seconds: fetch.timeout_seconds,
            max_redirects: fetch.max_redirects,
            max_response_size: fetch.max_response_size,
            max_concurrency: fetch.max_concurrency,
            user_agent: fetch.user_agent.clone(),
        };

        json_success(&status)
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for SerperScraperMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(DESCRIPTION.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for SerperScraperMcpServer {
    fn server_name(&self) -> &str {
        "serper-scraper"
    }

    fn server_description(&self) -> Option<&str> {
        Some(DESCRIPTION)
    }

    fn server_version(&self) -> Option<&str> {
        Some(env!("CARGO_PKG_VERSION"))
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "google_search" => {
                let query: SearchQuery = serde_json::from_value(params)?;
                self.google_search(Parameters(query)).await.map_err(Into::into)
            }

            "scrape" => {
                let request: PageRequest = serde_json::from_value(params)?;
                self.scrape(Parameters(request)).await.map_err(Into::into)
            }

            "batch_scrape" => {
                let request: BatchPageRequest = serde_json::from_value(params)?;
                self.batch_scrape(Parameters(request)).await.map_err(Into::into)
            }

            "get_config" => self.get_config().await.map_err(Into::into),

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}
