// src/page/fetch.rs
// =============================================================================
// Downloads pages over HTTP.
//
// The crawl engine only wants to know one thing: "did I get an HTML page?"
// So every way a request can go wrong collapses into `None`:
// - the server answered with a non-2xx status (404, 500, ...)
// - the answer is not HTML (images, PDFs, JSON, ...)
// - DNS, connection, TLS or timeout errors
//
// Failed pages are never retried. They are logged at debug level so that
// `-vv` shows why a page is missing from the output.
// =============================================================================

use super::Fetcher;
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    // One client for the whole crawl so connections are pooled and reused
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(%url, error = %e, "request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "non-success status");
            return None;
        }

        if !is_html(response.headers().get(CONTENT_TYPE)) {
            tracing::debug!(%url, "not an HTML page");
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!(%url, error = %e, "failed to read body");
                None
            }
        }
    }
}

// "text/html; charset=utf-8" counts, "application/xhtml+xml" does not
fn is_html(content_type: Option<&HeaderValue>) -> bool {
    content_type
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("text/html"))
        .unwrap_or(false)
}
