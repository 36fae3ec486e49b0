//! Crawl counters and the end-of-run summary
//!
//! Workers bump the counters in `CrawlStats` as they go; the coordinator freezes them
//! into a `CrawlSummary` once every worker has exited.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Live counters shared by all workers
#[derive(Debug, Default)]
pub struct CrawlStats {
    fetched: AtomicUsize,
    failed: AtomicUsize,
    timed_out: AtomicUsize,
    references: AtomicUsize,
    admitted: AtomicUsize,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document was fetched and fully scanned
    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    /// A fetch or body read failed
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// A document exceeded the per-item execution timeout
    pub fn record_timed_out(&self) {
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }

    /// `found` citations were seen, `admitted` of which were new URLs
    pub fn record_references(&self, found: usize, admitted: usize) {
        self.references.fetch_add(found, Ordering::Relaxed);
        self.admitted.fetch_add(admitted, Ordering::Relaxed);
    }

    pub fn fetched(&self) -> usize {
        self.fetched.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn timed_out(&self) -> usize {
        self.timed_out.load(Ordering::Relaxed)
    }

    pub fn references(&self) -> usize {
        self.references.load(Ordering::Relaxed)
    }

    pub fn admitted(&self) -> usize {
        self.admitted.load(Ordering::Relaxed)
    }
}

/// Outcome of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// The URL the crawl started from
    pub seed: String,

    /// Every URL admitted during the run, sorted
    pub visited: Vec<String>,

    /// Documents fetched and scanned
    pub fetched: usize,

    /// Documents whose fetch failed
    pub failed: usize,

    /// Documents abandoned after the execution timeout
    pub timed_out: usize,

    /// Citation markers found, duplicates included
    pub references: usize,

    /// Admissions that found the work queue full
    pub queue_overflows: usize,

    /// Workers that retired after the idle timeout
    pub idle_expired_workers: usize,

    /// Workers that stopped on cancellation
    pub cancelled_workers: usize,

    /// Whether the cancellation token fired during the run
    pub cancelled: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Admitted URLs that were never fetched successfully
    pub fn unfetched(&self) -> usize {
        self.visited.len().saturating_sub(self.fetched)
    }
}

/// Prints a crawl summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Seed: {}", summary.seed);
    println!("  Documents visited: {}", summary.visited.len());
    println!("  Documents fetched: {}", summary.fetched);
    println!("  Fetch failures: {}", summary.failed);
    println!("  Execution timeouts: {}", summary.timed_out);
    println!("  Citations found: {}", summary.references);
    println!("  Queue overflows: {}", summary.queue_overflows);
    println!();

    println!("Workers:");
    println!("  Idle-expired: {}", summary.idle_expired_workers);
    println!("  Cancelled: {}", summary.cancelled_workers);
    println!();

    let elapsed = summary.elapsed();
    let rate = if elapsed.as_secs_f64() > 0.0 {
        summary.fetched as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    println!(
        "Finished {} in {:.1}s ({:.2} documents/sec)",
        if summary.cancelled {
            "after cancellation"
        } else {
            "normally"
        },
        elapsed.as_secs_f64(),
        rate
    );
}
