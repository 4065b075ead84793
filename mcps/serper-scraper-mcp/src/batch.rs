//! Concurrent scraping of many URLs
//!
//! Each URL gets its own task in a [`JoinSet`], gated by a semaphore. Tasks
//! report their input index with the result, so output order always equals
//! input order no matter which fetch finishes first. A failing or panicking
//! task only affects its own slot. Dropping the batch future aborts every
//! task still queued or in flight.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::fetch::Fetcher;
use crate::pipeline::scrape_page;
use crate::types::{BatchSummary, PageResult};

/// Scrape `urls` concurrently. `max_concurrency` caps in-flight fetches;
/// 0 means no cap.
pub async fn scrape_batch(
    fetcher: &Fetcher,
    urls: &[String],
    include_markdown: bool,
    max_concurrency: usize,
) -> Vec<PageResult> {
    let semaphore = Arc::new(Semaphore::new(permits(max_concurrency)));

    tracing::info!(
        urls = urls.len(),
        max_concurrency,
        include_markdown,
        "Starting batch scrape"
    );

    let mut tasks = JoinSet::new();
    for (index, url) in urls.iter().enumerate() {
        let fetcher = fetcher.clone();
        let semaphore = Arc::clone(&semaphore);
        let url = url.clone();
        tasks.spawn(async move {
            // The semaphore is never closed, so acquire cannot fail.
            let _permit = semaphore.acquire_owned().await.ok();
            (index, scrape_page(&fetcher, &url, include_markdown).await)
        });
    }

    let mut slots: Vec<Option<PageResult>> = (0..urls.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => tracing::error!(error = %e, "Scrape task did not complete"),
        }
    }

    // A slot is only empty when its task panicked.
    let results: Vec<PageResult> = slots
        .into_iter()
        .zip(urls)
        .map(|(slot, url)| {
            slot.unwrap_or_else(|| {
                PageResult::failure(url.as_str(), Utc::now(), "scrape task failed")
            })
        })
        .collect();

    let summary = BatchSummary::from_results(&results);
    tracing::info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Batch scrape complete"
    );

    results
}

/// Semaphore size for a configured cap; 0 and oversized caps become the
/// semaphore's maximum
fn permits(max_concurrency: usize) -> usize {
    match max_concurrency {
        0 => Semaphore::MAX_PERMITS,
        n => n.min(Semaphore::MAX_PERMITS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;

    #[test]
    fn test_permits() {
        assert_eq!(permits(0), Semaphore::MAX_PERMITS);
        assert_eq!(permits(4), 4);
        assert_eq!(permits(usize::MAX), Semaphore::MAX_PERMITS);
    }

    #[tokio::test]
    async fn test_oversized_cap_does_not_panic() {
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let urls = vec!["not a url".to_string()];

        let results = scrape_batch(&fetcher, &urls, false, usize::MAX).await;

        assert_eq!(results.len(), 1);
        assert!(!results[0].is_success());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        assert!(scrape_batch(&fetcher, &[], false, 2).await.is_empty());
    }
}
