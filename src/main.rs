// src/main.rs
// =============================================================================
// Entry point of the site-crawler CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr)
// 3. Build the real fetcher / extractor / filter / presenter
// 4. Run the crawl to completion
// 5. Exit with a proper code:
//      0 = crawl finished
//      1 = no seed URL given (usage printed)
//      2 = the crawl could not start or was aborted
//
// stdout carries nothing but the page reports, so the output can be piped
// into other tools. Everything else goes to stderr.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod page;
mod present;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Cli;
use config::CrawlConfig;
use crawl::{CrawlSummary, Crawler, Seed};
use error::CrawlError;
use page::{DomainFilter, HtmlExtractor, HttpFetcher};
use present::{JsonPresenter, Presenter, TreePresenter};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const EXIT_USAGE: i32 = 1;
const EXIT_FAILURE: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let exit_code = execute(&cli).await;
    std::process::exit(exit_code);
}

// Runs the whole command and maps the outcome to an exit code
async fn execute(cli: &Cli) -> i32 {
    let Some(seed_url) = cli.seed_url.as_deref() else {
        eprintln!("{}", Cli::command().render_usage());
        eprintln!("\nerror: a seed URL is required");
        return EXIT_USAGE;
    };

    match run(cli, seed_url).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole cause chain on one line
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

// RUST_LOG wins when set, otherwise -v flags pick the level
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli, seed_url: &str) -> Result<()> {
    let seed = Seed::parse(seed_url)?;
    let config = cli.crawl_config();

    let fetcher = HttpFetcher::new(&config)?;
    let filter = DomainFilter::new(seed.host.as_str());
    tracing::info!(host = filter.host(), "only following links on this host");

    // The presenter is a type parameter of the crawler, so each output format
    // gets its own monomorphized crawl
    let summary = if cli.json {
        let summary = crawl_with(fetcher, filter, JsonPresenter::stdout(), config, &seed).await?;
        eprintln!("{}", summary_line(&summary)?);
        summary
    } else {
        let summary = crawl_with(fetcher, filter, TreePresenter::stdout(), config, &seed).await?;
        print_summary(&summary);
        summary
    };

    tracing::debug!(?summary, "final totals");
    Ok(())
}

async fn crawl_with<P: Presenter>(
    fetcher: HttpFetcher,
    filter: DomainFilter,
    presenter: P,
    config: CrawlConfig,
    seed: &Seed,
) -> Result<CrawlSummary, CrawlError> {
    let crawler = Arc::new(Crawler::new(fetcher, HtmlExtractor::new(), filter, presenter, config));
    crawler.run(seed).await
}

// Totals as one JSON object, the --json counterpart of print_summary
fn summary_line(summary: &CrawlSummary) -> serde_json::Result<String> {
    serde_json::to_string(summary)
}

// Human-readable totals, on stderr so stdout stays clean
fn print_summary(summary: &CrawlSummary) {
    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   📄 Pages crawled: {}", summary.pages);
    eprintln!("   ⚠️  Failed fetches: {}", summary.failed_fetches);
    if summary.skipped_pages > 0 {
        eprintln!("   ⏭️  Skipped pages: {}", summary.skipped_pages);
    }
    eprintln!("   🔗 URLs visited: {}", summary.visited);
}
