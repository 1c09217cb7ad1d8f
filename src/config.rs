// src/config.rs
// =============================================================================
// Settings for one crawl run.
//
// The CLI (cli.rs) fills these in from flags; tests build them directly with
// struct update syntax: CrawlConfig { workers: 1, ..Default::default() }
// =============================================================================

use clap::ValueEnum;
use std::time::Duration;

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// What to do when a page's links cannot be extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExtractionPolicy {
    /// Stop the whole crawl and report the page
    #[default]
    Abort,
    /// Log the page and keep crawling without its links
    Skip,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Number of worker tasks pulling from the frontier
    pub workers: usize,
    /// Pages being worked on at once (fetch through re-queue)
    pub max_in_flight: usize,
    /// Optional separate cap on concurrent fetches only
    pub max_fetches: Option<usize>,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    pub extraction_policy: ExtractionPolicy,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_CONCURRENCY,
            max_in_flight: DEFAULT_CONCURRENCY,
            max_fetches: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            extraction_policy: ExtractionPolicy::default(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
