//! Admission gate and work queue shared by all workers
//!
//! The frontier pairs a concurrent visited set with a bounded FIFO queue. `admit` is
//! the only way into the queue, and it marks a URL visited and enqueues it in one step,
//! so a URL reaches the workers at most once per run no matter how many workers
//! discover it concurrently.
//!
//! # Overflow policy
//!
//! The queue holds `workers × pages_per_second` URLs. When it is full, `admit` does not
//! block its caller: the URL is handed to a detached task that waits for capacity. The
//! URL is already marked visited at that point, so it is still delivered exactly once.
//! The detached send is abandoned only when the crawl is cancelled.

use dashmap::DashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Visited set plus work queue
#[derive(Debug)]
pub struct Frontier {
    visited: DashSet<String>,
    sender: mpsc::Sender<String>,
    receiver: Mutex<mpsc::Receiver<String>>,
    cancel: CancellationToken,
    overflows: AtomicUsize,
}

impl Frontier {
    /// Creates an empty frontier whose queue holds at most `capacity` URLs
    ///
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize, cancel: CancellationToken) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        Self {
            visited: DashSet::new(),
            sender,
            receiver: Mutex::new(receiver),
            cancel,
            overflows: AtomicUsize::new(0),
        }
    }

    /// Marks `url` visited and enqueues it, unless it was admitted before
    ///
    /// Returns `true` for exactly one caller per distinct URL. URLs are compared as exact
    /// strings. Must be called from within a tokio runtime, since a full queue hands the
    /// URL to a spawned task.
    pub fn admit(&self, url: impl Into<String>) -> bool {
        let url = url.into();

        if !self.visited.insert(url.clone()) {
            tracing::trace!("Already admitted: {}", url);
            return false;
        }

        match self.sender.try_send(url) {
            Ok(()) => {}
            Err(TrySendError::Full(url)) => {
                self.overflows.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Work queue full, deferring {}", url);

                let sender = self.sender.clone();
                let cancel = self.cancel.clone();
                let deferred = url.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            tracing::trace!("Dropped deferred {} on cancellation", deferred);
                        }
                        result = sender.send(url) => {
                            if let Err(e) = result {
                                tracing::warn!("Work queue closed, lost {}", e.0);
                            }
                        }
                    }
                });
            }
            Err(TrySendError::Closed(url)) => {
                tracing::warn!("Work queue closed, lost {}", url);
            }
        }

        true
    }

    /// Waits for the next queued URL
    ///
    /// Consumers take turns on the queue; cancel or time out the returned future to stop
    /// waiting.
    pub async fn next(&self) -> Option<String> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }

    /// Returns true if `url` has been admitted during this run
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of URLs admitted so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// All admitted URLs, sorted
    pub fn visited_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.visited.iter().map(|url| url.key().clone()).collect();
        urls.sort();
        urls
    }

    /// Number of URLs currently sitting in the queue
    pub fn pending(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    /// Number of admissions that found the queue full
    pub fn overflows(&self) -> usize {
        self.overflows.load(Ordering::Relaxed)
    }
}
