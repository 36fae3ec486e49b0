//! Crawl worker
//!
//! A worker is a loop over the `WorkerState` machine:
//!
//! ```text
//! WaitingForWork --item--> RateLimited --granted--> Fetching --ok--> Extracting
//!       ^                                              |                 |
//!       +---------------- failure / exec timeout ------+-----------------+
//!
//! WaitingForWork --no item for idle_timeout--> IdleExpired --> Done
//! any active state --cancellation-----------> Cancelled   --> Done
//! ```
//!
//! Two timers drive it. The idle timer bounds a single wait on the queue and restarts
//! every time the worker goes back to waiting. The execution timer bounds fetching plus
//! scanning one document. When either fires, or the cancellation token does, the
//! pending future is dropped, which also aborts an in-flight HTTP request.
//!
//! A worker that idles out retires on its own. The crawl is over once every worker has
//! retired: since workers are the only producers of new URLs, a moment where no worker
//! received anything for a full idle timeout is taken to mean no work is left. This is a
//! heuristic, not a proof that the queue is exhausted.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::limiter::{Admission, RateLimiter};
use crate::crawler::parser::{scan_body, ReferencePatterns, ScanReport};
use crate::output::CrawlStats;
use crate::state::{Frontier, WorkerState};
use crate::FetchError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Everything the workers of one crawl share
#[derive(Debug)]
pub(crate) struct CrawlContext<F> {
    pub frontier: Frontier,
    pub limiter: RateLimiter,
    pub fetcher: F,
    pub patterns: ReferencePatterns,
    pub stats: CrawlStats,
    pub cancel: CancellationToken,
    pub idle_timeout: Duration,
    pub crawl_timeout: Duration,
}

/// Why a worker stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// No queue item arrived within the idle timeout
    IdleExpired,
    /// The crawl was cancelled
    Cancelled,
}

impl WorkerExit {
    fn state(self) -> WorkerState {
        match self {
            Self::IdleExpired => WorkerState::IdleExpired,
            Self::Cancelled => WorkerState::Cancelled,
        }
    }
}

/// What a single successfully crawled document produced
#[derive(Debug, Clone, Copy)]
struct CrawlOutcome {
    report: ScanReport,
    admitted: usize,
}

pub(crate) struct Worker<F> {
    id: usize,
    state: WorkerState,
    ctx: Arc<CrawlContext<F>>,
}

impl<F: Fetcher> Worker<F> {
    pub fn new(id: usize, ctx: Arc<CrawlContext<F>>) -> Self {
        Self {
            id,
            state: WorkerState::WaitingForWork,
            ctx,
        }
    }

    /// Processes queue items until the worker idles out or the crawl is cancelled
    pub async fn run(mut self) -> WorkerExit {
        let ctx = self.ctx.clone();
        tracing::debug!("Worker {} started", self.id);

        let exit = loop {
            let url = tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => break WorkerExit::Cancelled,
                next = timeout(ctx.idle_timeout, ctx.frontier.next()) => match next {
                    Ok(Some(url)) => url,
                    // The frontier holds its own sender, so `None` means it is gone
                    Ok(None) | Err(_) => break WorkerExit::IdleExpired,
                },
            };

            self.transition(WorkerState::RateLimited);
            if ctx.limiter.acquire(&ctx.cancel).await == Admission::Cancelled {
                break WorkerExit::Cancelled;
            }

            self.transition(WorkerState::Fetching);
            let outcome = tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => break WorkerExit::Cancelled,
                outcome = timeout(ctx.crawl_timeout, self.crawl(&url)) => outcome,
            };

            match outcome {
                Ok(Ok(CrawlOutcome { report, admitted })) => {
                    ctx.stats.record_fetched();
                    ctx.stats.record_references(report.references, admitted);
                    tracing::debug!(
                        "Crawled {}: {} pages, {} citations, {} new",
                        url,
                        report.pages,
                        report.references,
                        admitted
                    );
                    if report.dropped_bytes > 0 {
                        tracing::trace!(
                            "{}: {} bytes after the last page footer were not scanned",
                            url,
                            report.dropped_bytes
                        );
                    }
                }
                Ok(Err(e)) => {
                    ctx.stats.record_failed();
                    tracing::warn!("Crawling error: {}", e);
                }
                Err(_) => {
                    ctx.stats.record_timed_out();
                    tracing::warn!(
                        "Crawling {} exceeded {:?}, abandoning it",
                        url,
                        ctx.crawl_timeout
                    );
                }
            }

            self.transition(WorkerState::WaitingForWork);
        };

        self.transition(exit.state());
        self.transition(WorkerState::Done);
        tracing::debug!("Worker {} exited: {}", self.id, exit.state());
        exit
    }

    /// Fetches one document and admits every URL it cites
    async fn crawl(&mut self, url: &str) -> Result<CrawlOutcome, FetchError> {
        let ctx = self.ctx.clone();
        tracing::info!("Crawling: {}", url);

        let body = ctx.fetcher.fetch(url).await?;
        self.transition(WorkerState::Extracting);

        let mut admitted = 0;
        let report = scan_body(&ctx.patterns, body, |cited| {
            for cited_url in cited {
                if ctx.frontier.admit(cited_url) {
                    admitted += 1;
                }
            }
        })
        .await
        .map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(CrawlOutcome { report, admitted })
    }

    fn transition(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "worker {}: illegal transition {} -> {}",
            self.id,
            self.state,
            next
        );
        tracing::trace!("Worker {}: {} -> {}", self.id, self.state, next);
        self.state = next;
    }
}
