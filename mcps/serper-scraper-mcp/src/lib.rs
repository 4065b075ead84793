//! Serper Scraper MCP Library
//!
//! Google search through the Serper API plus page scraping: fetch a URL and
//! return its title, visible text, meta tags, JSON-LD blocks and an optional
//! markdown rendering. Batches are scraped concurrently with per-URL failure
//! isolation and input order preserved.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use serper_scraper_mcp::{Config, ScraperClient, PageRequest};
//!
//! let client = ScraperClient::new(&Config::load()?)?;
//! let page = client
//!     .scrape(&PageRequest { url: "https://example.com".into(), include_markdown: true })
//!     .await;
//! ```
//!
//! # Configuration
//! Set `SERPER_API_KEY` for search, and optionally point
//! `SERPER_SCRAPER_CONFIG_PATH` at a TOML file (default
//! `~/.binks/serper-scraper.toml`).

pub mod backends;
pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod markdown;
pub mod pipeline;
pub mod server;
pub mod types;

pub use client::ScraperClient;
pub use config::Config;
pub use error::{ScrapeError, ScrapeResult};
pub use server::SerperScraperMcpServer;

// Re-export request/result types for direct API usage
pub use types::{
    BatchPageRequest, BatchSummary, MetaTag, PageRequest, PageResult, SearchQuery,
    StructuredDataBlock, TimeRange,
};
