// src/crawl/limiter.rs
// =============================================================================
// A counting limiter: at most N holders at a time.
//
// The crawl driver takes a permit before it starts working on a page and keeps
// it until the page is fully handled (fetch, extract, filter, present,
// re-queue). So the limit caps whole work items, CPU-heavy HTML parsing
// included, not just network requests. An optional second limiter can wrap
// only the fetch step (see driver.rs).
//
// Built on tokio's Semaphore. A permit goes back to the pool when it is
// dropped, so a worker that bails out early can never leak one.
// =============================================================================

use crate::error::CrawlError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    permits: Arc<Semaphore>,
    capacity: usize,
}

// One slot in the limiter, held until dropped or released
#[derive(Debug)]
pub struct Permit {
    _inner: OwnedSemaphorePermit,
}

impl Permit {
    /// Gives the slot back. Same as dropping the permit.
    pub fn release(self) {}
}

impl ConcurrencyLimiter {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits until a slot is free and takes it.
    pub async fn acquire(&self) -> Result<Permit, CrawlError> {
        let inner = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| CrawlError::LimiterClosed)?;
        Ok(Permit { _inner: inner })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Slots nobody is holding right now
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}
