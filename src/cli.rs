// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
//   site-crawler [OPTIONS] <SEED_URL>
//
// The seed URL is optional at the clap level on purpose: when it is missing we
// print our own usage line and exit with status 1 (clap would use 2).
// =============================================================================

use crate::config::{CrawlConfig, ExtractionPolicy, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use clap::{ArgAction, Parser};
use std::num::NonZeroUsize;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "site-crawler",
    version,
    about = "Crawls every page of one website and lists the links on each page",
    long_about = "site-crawler starts at the seed URL, follows every link that stays on the \
                  same host, visits each page once and prints the same-host links found on it."
)]
pub struct Cli {
    /// Page to start from (e.g., https://example.com)
    pub seed_url: Option<String>,

    /// Number of worker tasks (raised to --concurrency if lower)
    #[arg(long, default_value_t = nonzero(DEFAULT_CONCURRENCY))]
    pub workers: NonZeroUsize,

    /// Pages processed at once (fetch, parse and report)
    #[arg(long, default_value_t = nonzero(DEFAULT_CONCURRENCY))]
    pub concurrency: NonZeroUsize,

    /// Separate cap on HTTP requests in flight (default: no extra cap)
    #[arg(long)]
    pub fetch_concurrency: Option<NonZeroUsize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// What to do when a page's links cannot be extracted
    #[arg(long, value_enum, default_value_t = ExtractionPolicy::Abort)]
    pub on_extract_error: ExtractionPolicy,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Print one JSON object per page instead of a tree
    #[arg(long)]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

// DEFAULT_CONCURRENCY is a non-zero constant
fn nonzero(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN)
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        let defaults = CrawlConfig::default();
        CrawlConfig {
            workers: self.workers.get(),
            max_in_flight: self.concurrency.get(),
            max_fetches: self.fetch_concurrency.map(NonZeroUsize::get),
            request_timeout: Duration::from_secs(self.timeout),
            extraction_policy: self.on_extract_error,
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }

    // Log level used when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
