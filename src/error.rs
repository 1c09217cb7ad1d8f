// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Two kinds of failure exist during a crawl:
// - Fetch failures: NOT errors. The fetcher turns them into `None` and the
//   page is simply skipped (see page/fetch.rs).
// - Extraction failures: real errors. By default they stop the whole run.
//
// We use `thiserror` to derive std::error::Error + Display for our enums,
// and the binary converts them into anyhow errors at the top level.
// =============================================================================

use thiserror::Error;

// Why a page's HTML could not be turned into a set of links
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page URL itself is not a valid absolute URL
    #[error("invalid base URL '{base}': {source}")]
    InvalidBase {
        base: String,
        #[source]
        source: url::ParseError,
    },

    /// An href on the page cannot be resolved against the page URL
    #[error("unresolvable link '{href}': {source}")]
    UnresolvableHref {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

// Errors that end a crawl run
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed is not an absolute URL with a host
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    /// Link extraction failed and the extraction policy is Abort
    #[error("failed to extract links from {url}: {source}")]
    Extraction {
        url: String,
        #[source]
        source: ExtractError,
    },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// A concurrency limiter was closed while a worker waited on it
    #[error("concurrency limiter closed")]
    LimiterClosed,

    /// A worker task panicked or was cancelled
    #[error("crawl worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_names_the_page() {
        let source = ExtractError::UnresolvableHref {
            href: "http://[broken".to_string(),
            source: url::ParseError::InvalidIpv6Address,
        };
        let err = CrawlError::Extraction {
            url: "https://example.com/bad".to_string(),
            source,
        };

        let message = err.to_string();
        assert!(message.contains("https://example.com/bad"));
    }
}
