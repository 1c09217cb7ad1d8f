// src/page/mod.rs
// =============================================================================
// Everything the crawl engine does to a single page, behind small traits:
//
// - Fetcher:    URL -> HTML (or nothing)
// - Extractor:  HTML -> every link on the page
// - LinkFilter: links -> only the links we are allowed to follow
//
// The engine in crawl/ only knows these traits. The real implementations live
// in the submodules; tests plug in in-memory fakes instead.
//
// Rust concepts:
// - Traits: like interfaces, a set of methods a type promises to have
// - `impl Future + Send` in a trait: an async method whose future may move
//   between threads, which tokio::spawn requires
// =============================================================================

mod extract;
mod fetch;
mod filter;

pub use extract::HtmlExtractor;
pub use fetch::HttpFetcher;
pub use filter::DomainFilter;

use crate::error::ExtractError;
use std::collections::BTreeSet;
use std::future::Future;

// A set of canonical absolute URLs. Sorted, which keeps output stable.
pub type LinkSet = BTreeSet<String>;

pub trait Fetcher: Send + Sync + 'static {
    /// Downloads a page. Any failure at all (bad status, not HTML, network
    /// error, timeout) is reported as `None`.
    fn fetch(&self, url: &str) -> impl Future<Output = Option<String>> + Send;
}

pub trait Extractor: Send + Sync + 'static {
    /// Finds every link in `content`, resolved against `base_url` and with
    /// the `#fragment` removed.
    fn extract(&self, base_url: &str, content: &str) -> Result<LinkSet, ExtractError>;
}

pub trait LinkFilter: Send + Sync + 'static {
    fn filter(&self, links: LinkSet) -> LinkSet;
}
