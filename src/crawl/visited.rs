// src/crawl/visited.rs
// =============================================================================
// The visited gate decides which URLs get crawled.
//
// A URL counts as "visited" as soon as a worker has taken it off the frontier
// for processing. The gate owns the set of such URLs and is the only thing
// that adds to it. The set only grows.
//
// Two operations:
// - dequeue_unvisited(): pull the next URL nobody has taken yet. Checking the
//   set and inserting into it happens under one lock, so two workers can never
//   walk away with the same URL.
// - add_unvisited(): push newly found links that are not in the set yet. This
//   check is only a shortcut: it does NOT mark anything visited. Two workers
//   that find the same new link may both queue it; the duplicate gets thrown
//   away later by dequeue_unvisited().
// =============================================================================

use super::frontier::Frontier;
use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct VisitedGate {
    visited: Mutex<HashSet<String>>,
}

impl VisitedGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pulls the next URL that has never been dispatched and marks it visited.
    ///
    /// URLs that were already visited are marked done on the frontier and
    /// skipped. Returns `None` when the frontier is drained.
    pub async fn dequeue_unvisited(&self, frontier: &Frontier) -> Option<String> {
        loop {
            let url = frontier.dequeue().await?;

            // The whole check-and-mark is this one insert under the lock
            let is_new = self.visited.lock().insert(url.clone());
            if is_new {
                return Some(url);
            }

            tracing::trace!(%url, "dropping duplicate frontier entry");
            frontier.mark_done();
        }
    }

    /// Queues every link that has not been visited yet.
    ///
    /// Returns how many links were queued.
    pub fn add_unvisited<I>(&self, links: I, frontier: &Frontier) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut queued = 0;
        for link in links {
            let link = link.as_ref();
            if !self.contains(link) {
                frontier.enqueue(link);
                queued += 1;
            }
        }
        queued
    }

    pub fn contains(&self, url: &str) -> bool {
        self.visited.lock().contains(url)
    }

    // Number of URLs dispatched so far
    pub fn len(&self) -> usize {
        self.visited.lock().len()
    }

    // Only used by tests to start from a partly crawled state
    #[cfg(test)]
    fn mark_visited(&self, url: &str) {
        self.visited.lock().insert(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn gate_with(visited: &[&str]) -> VisitedGate {
        let gate = VisitedGate::new();
        for url in visited {
            gate.mark_visited(url);
        }
        gate
    }

    async fn drain_queue(frontier: &Frontier) -> Vec<String> {
        let mut urls = Vec::new();
        while !frontier.is_empty() {
            urls.push(frontier.dequeue().await.unwrap());
        }
        urls
    }

    #[tokio::test]
    async fn test_add_unvisited_skips_visited_links() {
        let frontier = Frontier::new();
        let gate = gate_with(&["https://example.com/page1", "https://example.com/page2"]);
        let links = [
            "https://example.com/page1",
            "https://example.com/page3",
            "https://example.com/page4",
        ];

        let queued = gate.add_unvisited(links, &frontier);

        assert_eq!(queued, 2);
        let added: HashSet<_> = drain_queue(&frontier).await.into_iter().collect();
        assert!(added.contains("https://example.com/page3"));
        assert!(added.contains("https://example.com/page4"));
        assert!(!added.contains("https://example.com/page1"));
    }

    #[tokio::test]
    async fn test_add_unvisited_with_no_links() {
        let frontier = Frontier::new();
        let gate = VisitedGate::new();

        gate.add_unvisited(Vec::<String>::new(), &frontier);
        assert!(frontier.is_empty());
    }

    #[tokio::test]
    async fn test_add_unvisited_when_everything_is_visited() {
        let frontier = Frontier::new();
        let gate = gate_with(&["https://example.com/page1", "https://example.com/page2"]);

        gate.add_unvisited(["https://example.com/page1", "https://example.com/page2"], &frontier);
        assert!(frontier.is_empty());
    }

    #[tokio::test]
    async fn test_add_unvisited_does_not_mark_visited() {
        let frontier = Frontier::new();
        let gate = VisitedGate::new();

        gate.add_unvisited(["https://example.com/page1"], &frontier);
        assert!(!gate.contains("https://example.com/page1"));
        assert_eq!(gate.len(), 0);
    }

    #[tokio::test]
    async fn test_dequeue_unvisited_marks_url_visited() {
        let frontier = Frontier::with_seed("https://example.com/page1");
        let gate = VisitedGate::new();

        let url = gate.dequeue_unvisited(&frontier).await;

        assert_eq!(url.as_deref(), Some("https://example.com/page1"));
        assert!(gate.contains("https://example.com/page1"));
    }

    #[tokio::test]
    async fn test_dequeue_unvisited_skips_visited_and_marks_them_done() {
        let frontier = Frontier::new();
        let gate = gate_with(&["https://example.com/page1"]);
        frontier.enqueue("https://example.com/page1");
        frontier.enqueue("https://example.com/page2");

        let url = gate.dequeue_unvisited(&frontier).await;
        assert_eq!(url.as_deref(), Some("https://example.com/page2"));

        // page1 was already marked done by the gate; only page2 is in flight
        assert_eq!(frontier.pending(), 1);
        frontier.mark_done();
        timeout(Duration::from_millis(100), frontier.drain())
            .await
            .expect("drain should complete");
    }

    #[tokio::test]
    async fn test_dequeue_unvisited_returns_none_when_only_duplicates_remain() {
        let frontier = Frontier::new();
        let gate = gate_with(&["https://example.com/a"]);
        frontier.enqueue("https://example.com/a");
        frontier.enqueue("https://example.com/a");

        let url = gate.dequeue_unvisited(&frontier).await;
        assert_eq!(url, None);
        assert_eq!(frontier.pending(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_add_unvisited_never_requeues_visited() {
        let frontier = Frontier::new();
        let gate = gate_with(&["https://example.com/page1"]);
        let links1 = vec!["https://example.com/page1", "https://example.com/page2"];
        let links2 = vec!["https://example.com/page2", "https://example.com/page3"];

        tokio::join!(
            async { gate.add_unvisited(links1, &frontier) },
            async { gate.add_unvisited(links2, &frontier) },
        );

        // page2 may show up twice; page1 never does
        let urls = drain_queue(&frontier).await;
        assert!(!urls.contains(&"https://example.com/page1".to_string()));
        assert!(urls.contains(&"https://example.com/page2".to_string()));
        assert!(urls.contains(&"https://example.com/page3".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_dequeue_unvisited_no_duplicates() {
        let frontier = Frontier::new();
        let gate = VisitedGate::new();
        for i in 0..10 {
            frontier.enqueue(format!("https://example.com/page{}", i));
        }

        let urls: Vec<_> = join_all((0..10).map(|_| gate.dequeue_unvisited(&frontier)))
            .await
            .into_iter()
            .map(Option::unwrap)
            .collect();

        let unique: HashSet<_> = urls.iter().collect();
        assert_eq!(unique.len(), urls.len());
        assert_eq!(gate.len(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_overlapping_producers_and_consumers_dispatch_once() {
        let frontier = Arc::new(Frontier::new());
        let gate = Arc::new(VisitedGate::new());

        // Every URL gets queued three times by racing producers
        for _ in 0..3 {
            for i in 0..50 {
                frontier.enqueue(format!("https://example.com/{}", i));
            }
        }

        let consumers: Vec<_> = (0..8)
            .map(|_| {
                let frontier = Arc::clone(&frontier);
                let gate = Arc::clone(&gate);
                tokio::spawn(async move {
                    let mut got = Vec::new();
                    while let Some(url) = gate.dequeue_unvisited(&frontier).await {
                        // Re-announce the page we just took, as a crawler would
                        gate.add_unvisited([url.as_str()], &frontier);
                        got.push(url);
                        frontier.mark_done();
                    }
                    got
                })
            })
            .collect();

        let mut dispatched = Vec::new();
        for consumer in consumers {
            dispatched.extend(consumer.await.unwrap());
        }

        let unique: HashSet<_> = dispatched.iter().cloned().collect();
        assert_eq!(dispatched.len(), 50);
        assert_eq!(unique.len(), 50);
        assert_eq!(frontier.pending(), 0);
    }

    #[tokio::test]
    async fn test_complex_workflow() {
        let frontier = Frontier::with_seed("https://example.com");
        let gate = VisitedGate::new();

        let url1 = gate.dequeue_unvisited(&frontier).await.unwrap();
        assert_eq!(url1, "https://example.com");

        let discovered = ["https://example.com/page1", "https://example.com/page2"];
        gate.add_unvisited(discovered, &frontier);
        frontier.mark_done();

        let url2 = gate.dequeue_unvisited(&frontier).await.unwrap();
        assert!(discovered.contains(&url2.as_str()));

        gate.add_unvisited(["https://example.com/page3"], &frontier);
        frontier.mark_done();

        let url3 = gate.dequeue_unvisited(&frontier).await.unwrap();
        frontier.mark_done();
        let url4 = gate.dequeue_unvisited(&frontier).await.unwrap();
        frontier.mark_done();

        let all: HashSet<_> = [url1, url2, url3, url4].into_iter().collect();
        assert_eq!(all.len(), 4);
        assert!(all.contains("https://example.com/page3"));

        assert_eq!(gate.dequeue_unvisited(&frontier).await, None);
        timeout(Duration::from_millis(100), frontier.drain())
            .await
            .expect("drain should complete");
    }
}
