//! Crawl frontier: the queue of URLs scheduled for fetching
//!
//! The frontier is a concurrency-safe FIFO of `(url, depth)` entries with a
//! `known` set covering everything ever enqueued or dequeued, so a URL is
//! dispatched to at most one worker per session. Admissibility and robots
//! checks are the caller's job before offering.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

/// Outcome of a bounded wait on the frontier
#[derive(Debug)]
pub enum TakeOutcome {
    /// An entry was dequeued and is now in flight
    Item(String, u32),
    /// The queue stayed empty for the whole idle window
    Idle,
    /// The frontier was cancelled
    Cancelled,
}

struct Inner {
    queue: VecDeque<(String, u32)>,
    known: HashSet<String>,
    in_flight: usize,
}

/// Concurrency-safe URL queue with enqueued-or-visited deduplication
pub struct Frontier {
    inner: Mutex<Inner>,
    notify: Notify,
    cancelled: AtomicBool,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                known: HashSet::new(),
                in_flight: 0,
            }),
            notify: Notify::new(),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Offers a URL at the given depth
    ///
    /// Returns `false` without side effects when the URL is empty or
    /// already known (enqueued or previously dequeued). Otherwise the URL
    /// joins the `known` set and the tail of the queue.
    pub fn offer(&self, url: &str, depth: u32) -> bool {
        if url.is_empty() {
            return false;
        }

        let mut inner = self.inner.lock().unwrap();
        if inner.known.contains(url) {
            return false;
        }

        inner.known.insert(url.to_string());
        inner.queue.push_back((url.to_string(), depth));
        drop(inner);

        self.notify.notify_one();
        true
    }

    /// Dequeues the next entry, waiting until one is available
    ///
    /// Returns `None` once the frontier is cancelled. A returned URL stays
    /// in `known`, so re-offers of it are rejected for the rest of the
    /// session. The entry counts as in flight until [`task_done`] is
    /// called for it.
    ///
    /// [`task_done`]: Frontier::task_done
    pub async fn take(&self) -> Option<(String, u32)> {
        loop {
            match self.take_or_idle(Duration::from_secs(3600)).await {
                TakeOutcome::Item(url, depth) => return Some((url, depth)),
                TakeOutcome::Cancelled => return None,
                TakeOutcome::Idle => continue,
            }
        }
    }

    /// Dequeues the next entry or reports an idle/cancelled frontier
    ///
    /// Waits at most `idle` for an entry to appear. The idle outcome lets
    /// workers periodically test [`is_drained`] without wedging on a
    /// transient empty queue while a peer is still mid-page.
    ///
    /// [`is_drained`]: Frontier::is_drained
    pub async fn take_or_idle(&self, idle: Duration) -> TakeOutcome {
        let deadline = tokio::time::Instant::now() + idle;

        loop {
            if self.cancelled.load(Ordering::Acquire) {
                return TakeOutcome::Cancelled;
            }

            {
                let mut inner = self.inner.lock().unwrap();
                if let Some((url, depth)) = inner.queue.pop_front() {
                    inner.in_flight += 1;
                    return TakeOutcome::Item(url, depth);
                }
            }

            let notified = self.notify.notified();
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return TakeOutcome::Idle;
            }
        }
    }

    /// Marks one in-flight entry as fully processed
    ///
    /// Must be called exactly once per item returned by `take`, after link
    /// extraction has finished enqueueing, so drain detection cannot fire
    /// while discovered links are still on the way in.
    pub fn task_done(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        drop(inner);
        self.notify.notify_waiters();
    }

    /// True when the queue is empty and no entry is in flight
    pub fn is_drained(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.queue.is_empty() && inner.in_flight == 0
    }

    /// Number of queued entries
    pub fn size(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    /// True when no entries are queued
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().queue.is_empty()
    }

    /// Drops all queued entries and forgets every known URL
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.queue.clear();
        inner.known.clear();
        inner.in_flight = 0;
    }

    /// Cancels the frontier, releasing all blocked `take` calls
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// True once the frontier has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Clears all state and lifts a previous cancellation
    pub fn reset(&self) {
        self.clear();
        self.cancelled.store(false, Ordering::Release);
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_offer_rejects_duplicates() {
        let frontier = Frontier::new();
        assert!(frontier.offer("https://a/", 0));
        assert!(!frontier.offer("https://a/", 0));
        assert_eq!(frontier.size(), 1);
    }

    #[test]
    fn test_offer_rejects_empty() {
        let frontier = Frontier::new();
        assert!(!frontier.offer("", 0));
        assert!(frontier.is_empty());
    }

    #[tokio::test]
    async fn test_taken_url_stays_known() {
        let frontier = Frontier::new();
        assert!(frontier.offer("https://a/", 0));

        let (url, depth) = frontier.take().await.unwrap();
        assert_eq!(url, "https://a/");
        assert_eq!(depth, 0);

        // Still rejected after dequeue.
        assert!(!frontier.offer("https://a/", 0));
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let frontier = Frontier::new();
        frontier.offer("https://a/", 0);
        frontier.offer("https://b/", 1);
        frontier.offer("https://c/", 2);

        assert_eq!(frontier.take().await.unwrap().0, "https://a/");
        assert_eq!(frontier.take().await.unwrap().0, "https://b/");
        assert_eq!(frontier.take().await.unwrap().0, "https://c/");
    }

    #[tokio::test]
    async fn test_take_blocks_until_offer() {
        let frontier = Arc::new(Frontier::new());

        let waiter = {
            let frontier = frontier.clone();
            tokio::spawn(async move { frontier.take().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.offer("https://late/", 3);

        let item = waiter.await.unwrap().unwrap();
        assert_eq!(item, ("https://late/".to_string(), 3));
    }

    #[tokio::test]
    async fn test_cancel_releases_blocked_take() {
        let frontier = Arc::new(Frontier::new());

        let waiter = {
            let frontier = frontier.clone();
            tokio::spawn(async move { frontier.take().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.cancel();

        assert!(waiter.await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_flight_blocks_drain() {
        let frontier = Frontier::new();
        frontier.offer("https://a/", 0);

        let _ = frontier.take().await.unwrap();
        assert!(frontier.is_empty());
        assert!(!frontier.is_drained());

        frontier.task_done();
        assert!(frontier.is_drained());
    }

    #[tokio::test]
    async fn test_take_or_idle_reports_idle() {
        let frontier = Frontier::new();
        let outcome = frontier.take_or_idle(Duration::from_millis(10)).await;
        assert!(matches!(outcome, TakeOutcome::Idle));
    }

    #[test]
    fn test_clear_forgets_known() {
        let frontier = Frontier::new();
        frontier.offer("https://a/", 0);
        frontier.clear();
        assert!(frontier.is_empty());
        assert!(frontier.offer("https://a/", 0));
    }

    #[tokio::test]
    async fn test_concurrent_offers_dedupe() {
        let frontier = Arc::new(Frontier::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let frontier = frontier.clone();
            handles.push(tokio::spawn(async move {
                let mut accepted = 0;
                for i in 0..100 {
                    if frontier.offer(&format!("https://site/{}", i), 1) {
                        accepted += 1;
                    }
                }
                accepted
            }));
        }

        let mut total = 0;
        for handle in handles {
            total += handle.await.unwrap();
        }

        // Each distinct URL accepted exactly once across all tasks.
        assert_eq!(total, 100);
        assert_eq!(frontier.size(), 100);
    }
}
