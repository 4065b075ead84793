//! Single-page scrape: fetch, parse, extract, optionally render markdown
//!
//! [`scrape_page`] never returns an error. Any failure along the way ends up
//! in [`PageResult::error`].

use chrono::Utc;
use scraper::Html;

use crate::error::ScrapeResult;
use crate::extract::{self, Extraction};
use crate::fetch::Fetcher;
use crate::markdown;
use crate::types::PageResult;

struct PageContent {
    html: String,
    extraction: Extraction,
    markdown: Option<String>,
}

/// Scrape one URL. The timestamp is taken before the fetch starts.
pub async fn scrape_page(fetcher: &Fetcher, url: &str, include_markdown: bool) -> PageResult {
    let timestamp = Utc::now();
    tracing::debug!(url, include_markdown, "Scraping page");

    match fetch_and_extract(fetcher, url, include_markdown).await {
        Ok(page) => {
            tracing::info!(
                url,
                bytes = page.html.len(),
                meta_tags = page.extraction.meta_tags.len(),
                json_ld = page.extraction.json_ld.len(),
                "Scraped page"
            );
            PageResult::success(url, timestamp, page.html, page.extraction, page.markdown)
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Scrape failed");
            PageResult::failure(url, timestamp, e.to_string())
        }
    }
}

async fn fetch_and_extract(
    fetcher: &Fetcher,
    url: &str,
    include_markdown: bool,
) -> ScrapeResult<PageContent> {
    let fetched = fetcher.fetch(url).await?;
    tracing::debug!(
        url,
        final_url = %fetched.final_url,
        content_type = fetched.content_type.as_deref().unwrap_or("unknown"),
        bytes = fetched.body.len(),
        "Fetched page"
    );
    Ok(process_html(fetched.body, include_markdown))
}

// `Html` is not `Send`, so it lives only inside this synchronous step.
fn process_html(html: String, include_markdown: bool) -> PageContent {
    let document = Html::parse_document(&html);
    let extraction = extract::extract(&document);
    let markdown = include_markdown.then(|| markdown::render(&document));

    PageContent {
        html,
        extraction,
        markdown,
    }
}
