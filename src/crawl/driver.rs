// src/crawl/driver.rs
// =============================================================================
// The crawl driver: runs a pool of workers over the frontier until the site
// is exhausted.
//
// Each worker repeats the same cycle for one URL at a time:
//
//   dequeue_unvisited -> acquire permit -> fetch -> extract -> filter
//       -> present -> add_unvisited -> release permit -> mark_done
//
// A failed fetch ends the cycle early: nothing is extracted, nothing queued,
// and the URL stays in the visited set, so it is never tried again.
//
// The run ends when every worker has seen the frontier drain (dequeue returns
// None). The caller then waits on drain() as a final barrier before building
// the summary. There is no depth or page limit: a site is assumed to have a
// finite number of pages.
//
// All per-run state (frontier, visited set, limiters, counters) lives in a
// CrawlRun created by run(), so the same Crawler can run many times, even at
// once, without the runs seeing each other.
// =============================================================================

use super::frontier::Frontier;
use super::limiter::ConcurrencyLimiter;
use super::visited::VisitedGate;
use crate::config::{CrawlConfig, ExtractionPolicy};
use crate::error::CrawlError;
use crate::page::{Extractor, Fetcher, LinkFilter};
use crate::present::Presenter;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// The starting point of a crawl, in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub url: String,
    pub host: String,
}

impl Seed {
    /// Parses the seed URL. It must be an absolute http(s) URL with a host.
    /// The fragment is dropped, like for every other link.
    pub fn parse(raw: &str) -> Result<Self, CrawlError> {
        let invalid = |reason: String| CrawlError::InvalidSeed {
            url: raw.to_string(),
            reason,
        };

        let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        let host = url
            .host_str()
            .ok_or_else(|| invalid("URL has no host".to_string()))?
            .to_string();
        url.set_fragment(None);

        Ok(Self {
            url: url.into(),
            host,
        })
    }
}

/// Totals for one finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    /// Pages fetched, extracted and presented
    pub pages: usize,
    /// URLs the fetcher returned nothing for
    pub failed_fetches: usize,
    /// Pages dropped by ExtractionPolicy::Skip
    pub skipped_pages: usize,
    /// Distinct URLs dispatched to the fetcher
    pub visited: usize,
}

// What happened to one work item
#[derive(Debug)]
enum ItemOutcome {
    Presented,
    FetchFailed,
    Skipped,
}

// State owned by a single run and shared by its workers
struct CrawlRun {
    frontier: Frontier,
    gate: VisitedGate,
    work_limiter: ConcurrencyLimiter,
    fetch_limiter: Option<ConcurrencyLimiter>,
    pages: AtomicUsize,
    failed_fetches: AtomicUsize,
    skipped_pages: AtomicUsize,
}

impl CrawlRun {
    fn new(config: &CrawlConfig, seed: &Seed) -> Self {
        Self {
            frontier: Frontier::with_seed(seed.url.as_str()),
            gate: VisitedGate::new(),
            work_limiter: ConcurrencyLimiter::new(config.max_in_flight.max(1)),
            fetch_limiter: config.max_fetches.map(|n| ConcurrencyLimiter::new(n.max(1))),
            pages: AtomicUsize::new(0),
            failed_fetches: AtomicUsize::new(0),
            skipped_pages: AtomicUsize::new(0),
        }
    }

    fn record(&self, outcome: &ItemOutcome) {
        let counter = match outcome {
            ItemOutcome::Presented => &self.pages,
            ItemOutcome::FetchFailed => &self.failed_fetches,
            ItemOutcome::Skipped => &self.skipped_pages,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn summary(&self) -> CrawlSummary {
        CrawlSummary {
            pages: self.pages.load(Ordering::Relaxed),
            failed_fetches: self.failed_fetches.load(Ordering::Relaxed),
            skipped_pages: self.skipped_pages.load(Ordering::Relaxed),
            visited: self.gate.len(),
        }
    }
}

pub struct Crawler<F, X, L, P> {
    fetcher: F,
    extractor: X,
    filter: L,
    presenter: P,
    config: CrawlConfig,
}

impl<F, X, L, P> Crawler<F, X, L, P>
where
    F: Fetcher,
    X: Extractor,
    L: LinkFilter,
    P: Presenter,
{
    pub fn new(fetcher: F, extractor: X, filter: L, presenter: P, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            extractor,
            filter,
            presenter,
            config,
        }
    }

    /// Crawls everything reachable from `seed` and returns the totals.
    ///
    /// Fails on the first extraction error when the policy is Abort; the
    /// remaining workers are cancelled.
    pub async fn run(self: Arc<Self>, seed: &Seed) -> Result<CrawlSummary, CrawlError> {
        let run = Arc::new(CrawlRun::new(&self.config, seed));
        // Every permit needs a worker to hold it
        let worker_count = self.config.workers.max(run.work_limiter.capacity());

        tracing::info!(
            seed = %seed.url,
            workers = worker_count,
            max_in_flight = run.work_limiter.capacity(),
            max_fetches = ?run.fetch_limiter.as_ref().map(ConcurrencyLimiter::capacity),
            "starting crawl"
        );

        let mut workers = JoinSet::new();
        for worker in 0..worker_count {
            let crawler = Arc::clone(&self);
            let run = Arc::clone(&run);
            workers.spawn(async move { crawler.work(worker, &run).await });
        }

        while let Some(joined) = workers.join_next().await {
            // Worker panics and worker errors both end the run
            if let Err(e) = joined.map_err(CrawlError::from).and_then(|result| result) {
                workers.abort_all();
                return Err(e);
            }
        }

        run.frontier.drain().await;
        debug_assert!(run.frontier.is_empty());

        let summary = run.summary();
        tracing::info!(
            pages = summary.pages,
            failed_fetches = summary.failed_fetches,
            skipped_pages = summary.skipped_pages,
            visited = summary.visited,
            "crawl finished"
        );
        Ok(summary)
    }

    // One worker's loop. Returns when the frontier drains.
    async fn work(&self, worker: usize, run: &CrawlRun) -> Result<(), CrawlError> {
        while let Some(url) = run.gate.dequeue_unvisited(&run.frontier).await {
            tracing::debug!(
                worker,
                %url,
                queued = run.frontier.len(),
                free_slots = run.work_limiter.available(),
                "dispatched"
            );

            let permit = run.work_limiter.acquire().await?;
            let outcome = self.process(run, &url).await;
            permit.release();
            run.frontier.mark_done();

            let outcome = outcome?;
            tracing::trace!(worker, %url, ?outcome, "done");
            run.record(&outcome);
        }
        Ok(())
    }

    // fetch -> extract -> filter -> present -> enqueue, for one URL
    async fn process(&self, run: &CrawlRun, url: &str) -> Result<ItemOutcome, CrawlError> {
        let content = {
            let _fetch_permit = match &run.fetch_limiter {
                Some(limiter) => Some(limiter.acquire().await?),
                None => None,
            };
            self.fetcher.fetch(url).await
        };
        let Some(content) = content else {
            return Ok(ItemOutcome::FetchFailed);
        };

        let links = match self.extractor.extract(url, &content) {
            Ok(links) => links,
            Err(source) => match self.config.extraction_policy {
                ExtractionPolicy::Abort => {
                    return Err(CrawlError::Extraction {
                        url: url.to_string(),
                        source,
                    })
                }
                ExtractionPolicy::Skip => {
                    tracing::warn!(%url, error = %source, "skipping page whose links could not be extracted");
                    return Ok(ItemOutcome::Skipped);
                }
            },
        };

        let links = self.filter.filter(links);
        self.presenter.present(url, &links);

        let queued = run.gate.add_unvisited(&links, &run.frontier);
        tracing::debug!(%url, links = links.len(), queued, "page presented");
        Ok(ItemOutcome::Presented)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why `self: Arc<Self>` on run()?
//    - tokio::spawn needs tasks that own everything they use ('static)
//    - Each worker gets its own Arc clone of the crawler and of the run state
//
// 2. What is JoinSet?
//    - A group of spawned tasks we can wait on one at a time (join_next)
//    - Dropping it or calling abort_all() cancels the tasks still running
//
// 3. Why generics instead of Box<dyn Fetcher>?
//    - Fetcher::fetch returns `impl Future`, which trait objects can't do
//    - Generics also let tests swap in in-memory fakes at zero cost
// -----------------------------------------------------------------------------
