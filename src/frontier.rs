//! In-memory URL queue with visited-set deduplication, depth tracking, and
//! completion signaling for one crawl session.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Notify};

struct FrontierState {
    queue: VecDeque<(String, usize)>,
    visited: HashSet<String>,
    delivered: usize,
}

/// FIFO delivery of URLs to workers, deduplicated against a visited set,
/// bounded by `max_pages` and tracking per-URL crawl depth.
pub struct Frontier {
    state: Mutex<FrontierState>,
    notify_item: Notify,
    notify_done: Notify,
    /// Count of items handed out by `next()` with no matching `done()` yet.
    /// Queued-but-not-yet-delivered URLs (including any past `max_pages`
    /// that will never be delivered) are not counted, so `join()` reflects
    /// outstanding in-flight work rather than the whole visited set.
    pending: AtomicUsize,
    max_pages: usize,
}

impl Frontier {
    pub fn new(max_pages: usize) -> Self {
        Self {
            state: Mutex::new(FrontierState {
                queue: VecDeque::new(),
                visited: HashSet::new(),
                delivered: 0,
            }),
            notify_item: Notify::new(),
            notify_done: Notify::new(),
            pending: AtomicUsize::new(0),
            max_pages,
        }
    }

    /// Atomic check-and-insert against the visited set. Returns `true` only
    /// the first time a given URL is seen, at which point it is also queued
    /// at `depth`.
    pub async fn add(&self, url: impl Into<String>, depth: usize) -> bool {
        let url = url.into();
        let mut state = self.state.lock().await;
        if !state.visited.insert(url.clone()) {
            return false;
        }
        state.queue.push_back((url, depth));
        drop(state);
        self.notify_item.notify_one();
        true
    }

    /// Pops the head within `timeout`, or returns `None` on expiry or once
    /// `max_pages` have already been delivered. Marks the popped item
    /// in-flight; a matching `done()` is required for `join()` to unblock.
    pub async fn next(&self, timeout: Duration) -> Option<(String, usize)> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            {
                let mut state = self.state.lock().await;
                if state.delivered >= self.max_pages {
                    return None;
                }
                if let Some(item) = state.queue.pop_front() {
                    state.delivered += 1;
                    self.pending.fetch_add(1, Ordering::SeqCst);
                    return Some(item);
                }
            }
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }
            if tokio::time::timeout(remaining, self.notify_item.notified())
                .await
                .is_err()
            {
                return None;
            }
        }
    }

    /// Signals completion of one item dequeued via `next`, supporting a
    /// join-style barrier via [`Frontier::join`].
    pub fn done(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.notify_done.notify_waiters();
        }
    }

    /// Waits until every item delivered so far by `next()` has had a
    /// matching `done()` call.
    pub async fn join(&self) {
        loop {
            if self.pending.load(Ordering::SeqCst) == 0 {
                return;
            }
            self.notify_done.notified().await;
        }
    }

    pub async fn is_visited(&self, url: &str) -> bool {
        self.state.lock().await.visited.contains(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_add_returns_false_and_delivers_once() {
        let frontier = Frontier::new(10);
        assert!(frontier.add("https://a.com", 0).await);
        assert!(!frontier.add("https://a.com", 0).await);

        let first = frontier.next(Duration::from_millis(50)).await;
        assert_eq!(first, Some(("https://a.com".to_string(), 0)));
        let second = frontier.next(Duration::from_millis(50)).await;
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn next_times_out_on_empty_queue() {
        let frontier = Frontier::new(10);
        let result = frontier.next(Duration::from_millis(20)).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn respects_max_pages_cap() {
        let frontier = Frontier::new(1);
        frontier.add("https://a.com", 0).await;
        frontier.add("https://b.com", 0).await;
        assert!(frontier.next(Duration::from_millis(20)).await.is_some());
        assert!(frontier.next(Duration::from_millis(20)).await.is_none());
    }

    #[tokio::test]
    async fn join_waits_for_all_done_calls() {
        let frontier = std::sync::Arc::new(Frontier::new(10));
        frontier.add("https://a.com", 0).await;
        frontier.next(Duration::from_millis(50)).await;

        let f2 = frontier.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            f2.done();
        });

        frontier.join().await;
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn join_does_not_hang_on_urls_past_the_page_cap() {
        let frontier = Frontier::new(1);
        frontier.add("https://a.com", 0).await;
        frontier.add("https://b.com", 0).await; // never delivered, capped out

        let (url, _) = frontier.next(Duration::from_millis(20)).await.unwrap();
        assert_eq!(url, "https://a.com");
        frontier.done();

        tokio::time::timeout(Duration::from_millis(100), frontier.join())
            .await
            .expect("join() should not block on undelivered, capped-out urls");
    }
}
