//! HTTP fetch service for retrieving page HTML
//!
//! One GET per call, following redirects up to the configured limit. Every
//! failure comes back as [`ScrapeError::FetchFailed`] with a readable cause;
//! nothing is retried here.

pub mod types;

use reqwest::{redirect, Client};
use std::error::Error as _;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::{ScrapeError, ScrapeResult};
pub use types::FetchedPage;

/// HTTP fetch service. Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Create a new Fetcher with the given configuration
    pub fn new(config: &FetchConfig) -> ScrapeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Fetch a URL and return the body as text
    pub async fn fetch(&self, url: &str) -> ScrapeResult<FetchedPage> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_failure(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::FetchFailed(format!(
                "HTTP {} for url ({})",
                status,
                response.url()
            )));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        // Check Content-Length before downloading
        if let Some(len) = response.content_length() {
            self.check_size(len as usize)?;
        }

        // Content-Length may be absent or wrong, so the cap is enforced while reading.
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.transport_failure(&e))?
        {
            self.append_chunk(&mut bytes, &chunk)?;
        }
        let body = String::from_utf8_lossy(&bytes).into_owned();

        if body.trim().is_empty() {
            return Err(ScrapeError::FetchFailed(format!(
                "empty response body from {final_url}"
            )));
        }

        Ok(FetchedPage {
            final_url,
            content_type,
            body,
        })
    }

    fn append_chunk(&self, body: &mut Vec<u8>, chunk: &[u8]) -> ScrapeResult<()> {
        self.check_size(body.len() + chunk.len())?;
        body.extend_from_slice(chunk);
        Ok(())
    }

    fn check_size(&self, len: usize) -> ScrapeResult<()> {
        if len > self.config.max_response_size {
            return Err(ScrapeError::FetchFailed(format!(
                "Response too large: {} bytes (max: {} bytes)",
                len, self.config.max_response_size
            )));
        }
        Ok(())
    }

    fn transport_failure(&self, err: &reqwest::Error) -> ScrapeError {
        let cause = if err.is_timeout() {
            format!("timed out after {}s", self.config.timeout_seconds)
        } else if err.is_redirect() {
            format!("too many redirects (max: {})", self.config.max_redirects)
        } else {
            error_chain(err)
        };
        ScrapeError::FetchFailed(cause)
    }
}

/// Render an error and its sources as `outer: inner: root`
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> Fetcher {
        Fetcher::new(&FetchConfig {
            timeout_seconds: 2,
            ..FetchConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_streamed_body_stops_at_limit() {
        let fetcher = Fetcher::new(&FetchConfig {
            max_response_size: 8,
            ..FetchConfig::default()
        })
        .unwrap();
        let mut body = Vec::new();

        fetcher.append_chunk(&mut body, b"12345").unwrap();
        fetcher.append_chunk(&mut body, b"678").unwrap();
        let result = fetcher.append_chunk(&mut body, b"9");

        assert!(matches!(result, Err(ScrapeError::FetchFailed(msg)) if msg.contains("9 bytes")));
        assert_eq!(body, b"12345678");
    }

    #[tokio::test]
    async fn test_malformed_url_is_fetch_failure() {
        let result = fetcher().fetch("not a url").await;
        assert!(matches!(result, Err(ScrapeError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_failure() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = fetcher().fetch(&format!("http://{addr}/")).await;
        match result {
            Err(ScrapeError::FetchFailed(cause)) => assert!(!cause.is_empty()),
            other => panic!("expected FetchFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_size_limit() {
        let fetcher = Fetcher::new(&FetchConfig {
            max_response_size: 10,
            ..FetchConfig::default()
        })
        .unwrap();
        assert!(fetcher.check_size(10).is_ok());
        assert!(matches!(
            fetcher.check_size(11),
            Err(ScrapeError::FetchFailed(msg)) if msg.contains("too large")
        ));
    }
}
