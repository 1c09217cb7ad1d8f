// src/crawl/frontier.rs
// =============================================================================
// The frontier: a FIFO queue of URLs waiting to be crawled.
//
// Many worker tasks push to it and pull from it at the same time, so besides
// the queue itself it keeps a "pending" counter:
//
// - enqueue()   -> pending += 1
// - mark_done() -> pending -= 1 (once per dequeued item, when it is finished)
//
// An item therefore stays "pending" from the moment it is queued until the
// worker that pulled it says it is done. Only when pending reaches zero can no
// more URLs ever show up: nothing is queued and nobody is holding a page that
// might still produce links. That is when the crawl is over.
//
// The queue is unbounded on purpose. Backpressure comes from the concurrency
// limiter, never from the frontier.
//
// Rust concepts:
// - parking_lot::Mutex: a lock that never "poisons" (no unwrap on lock())
// - tokio::sync::Notify: wakes up tasks waiting for the queue to change
// =============================================================================

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;

// Everything that must change together lives under one lock
#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<String>,
    pending: usize,
}

#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    // Signalled whenever an item arrives or pending drops to zero
    changed: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Creates a frontier holding just the seed URL (pending = 1)
    pub fn with_seed(seed: impl Into<String>) -> Self {
        let frontier = Self::new();
        frontier.enqueue(seed);
        frontier
    }

    /// Appends a URL to the back of the queue. Never blocks.
    pub fn enqueue(&self, url: impl Into<String>) {
        {
            let mut state = self.state.lock();
            state.queue.push_back(url.into());
            state.pending += 1;
        }
        self.changed.notify_waiters();
    }

    /// Takes the URL at the front of the queue, waiting while the queue is
    /// empty but work is still pending elsewhere.
    ///
    /// Returns `None` once the frontier is drained: the queue is empty and
    /// pending is zero, so no item can ever arrive again.
    pub async fn dequeue(&self) -> Option<String> {
        loop {
            // Register interest BEFORE looking at the queue, otherwise an
            // enqueue between the check and the await would be missed
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.lock();
                if let Some(url) = state.queue.pop_front() {
                    return Some(url);
                }
                if state.pending == 0 {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Marks one dequeued item as finished.
    pub fn mark_done(&self) {
        let drained = {
            let mut state = self.state.lock();
            debug_assert!(state.pending > 0, "mark_done called more often than enqueue");
            state.pending = state.pending.saturating_sub(1);
            state.pending == 0
        };

        if drained {
            self.changed.notify_waiters();
        }
    }

    /// Waits until every enqueued item has been marked done.
    pub async fn drain(&self) {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let pending = self.pending();
            if pending == 0 {
                return;
            }

            notified.await;
        }
    }

    // Items queued or dequeued-but-not-done
    pub fn pending(&self) -> usize {
        self.state.lock().pending
    }

    // Items currently sitting in the queue
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not just use tokio::sync::mpsc?
//    - A channel has one receiver, but here many workers pull from the queue
//    - We also need "how much work is still open?", which a channel can't say
//    - A VecDeque behind a lock plus a Notify gives us both
//
// 2. What does notified().enable() do?
//    - It registers this task as a waiter right away, before we check the queue
//    - notify_waiters() only wakes tasks that are already registered
//    - Without it, an item pushed between "queue is empty" and ".await" would
//      never wake us up
//
// 3. Why is pending separate from the queue length?
//    - A URL leaves the queue when a worker takes it, but the worker may still
//      find new links on that page
//    - So "queue empty" does not mean "done"; "pending == 0" does
// -----------------------------------------------------------------------------
