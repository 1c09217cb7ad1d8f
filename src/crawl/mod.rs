// src/crawl/mod.rs
// =============================================================================
// The concurrent crawl engine.
//
// Pieces, smallest first:
// - frontier: FIFO queue of URLs plus a "pending work" counter and drain()
// - visited:  the gate that hands each URL to exactly one worker
// - limiter:  caps how many pages are being worked on at once
// - driver:   the worker pool that ties it all together
//
// The engine never touches the network or HTML itself. It talks to the
// Fetcher / Extractor / LinkFilter traits from page/ and the Presenter trait
// from present.rs.
// =============================================================================

mod driver;
mod frontier;
mod limiter;
mod visited;

pub use driver::{CrawlSummary, Crawler, Seed};
