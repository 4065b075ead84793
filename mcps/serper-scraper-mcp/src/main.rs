//! Serper Scraper MCP Server
//!
//! Google search via Serper and concurrent web page scraping over stdio.
//!
//! # Configuration
//! Set `SERPER_API_KEY` env var or configure in `~/.binks/serper-scraper.toml`

use serper_scraper_mcp::SerperScraperMcpServer;

mcp_common::serve_stdio!(SerperScraperMcpServer::load, "serper_scraper_mcp");
