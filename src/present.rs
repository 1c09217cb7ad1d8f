// src/present.rs
// =============================================================================
// Reports each crawled page and the same-site links found on it.
//
// Pages finish in whatever order the workers happen to finish them, so the
// presenters make no promise about page order. What they DO promise: one
// page's report is written in a single locked write, so two pages never end
// up interleaved line by line.
//
// Two formats:
// - TreePresenter (default, for humans):
//
//       🌐 https://example.com/
//        └─ https://example.com/about
//        └─ https://example.com/docs
//
// - JsonPresenter (--json, for scripts): one JSON object per line
//
//       {"url":"https://example.com/","links":["https://example.com/about"]}
// =============================================================================

use crate::page::LinkSet;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::{self, Stdout, Write};

pub trait Presenter: Send + Sync + 'static {
    fn present(&self, source_url: &str, links: &LinkSet);
}

// One line of --json output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    pub links: Vec<String>,
}

impl PageReport {
    pub fn new(url: &str, links: &LinkSet) -> Self {
        Self {
            url: url.to_string(),
            links: links.iter().cloned().collect(),
        }
    }
}

// Writes a whole block under the lock. Output errors (e.g. a closed pipe)
// must not stop the crawl, so they are only logged.
fn emit<W: Write>(out: &Mutex<W>, block: &[u8]) {
    let mut out = out.lock();
    if let Err(e) = out.write_all(block).and_then(|()| out.flush()) {
        tracing::warn!(error = %e, "failed to write page report");
    }
}

#[derive(Debug)]
pub struct TreePresenter<W> {
    out: Mutex<W>,
}

impl TreePresenter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> TreePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send + 'static> Presenter for TreePresenter<W> {
    fn present(&self, source_url: &str, links: &LinkSet) {
        let mut block = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(block, "\n🌐 {}", source_url);
        for link in links {
            let _ = writeln!(block, " └─ {}", link);
        }
        emit(&self.out, block.as_bytes());
    }
}

#[derive(Debug)]
pub struct JsonPresenter<W> {
    out: Mutex<W>,
}

impl JsonPresenter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send + 'static> Presenter for JsonPresenter<W> {
    fn present(&self, source_url: &str, links: &LinkSet) {
        let report = PageReport::new(source_url, links);
        match serde_json::to_vec(&report) {
            Ok(mut line) => {
                line.push(b'\n');
                emit(&self.out, &line);
            }
            Err(e) => tracing::warn!(url = %source_url, error = %e, "failed to serialize page report"),
        }
    }
}
