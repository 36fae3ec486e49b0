//! Crawler coordinator - orchestrates one crawl run
//!
//! The coordinator owns everything the workers share (the frontier, the rate limiter,
//! the fetcher and the counters), seeds the work queue, launches the worker pool and
//! waits for every worker to exit. It has no other way of knowing the crawl is over:
//! see the `worker` module for the idle-expiry termination rule.

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::limiter::RateLimiter;
use crate::crawler::parser::ReferencePatterns;
use crate::crawler::worker::{CrawlContext, Worker, WorkerExit};
use crate::output::{CrawlStats, CrawlSummary};
use crate::state::Frontier;
use crate::CrawlError;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// A single crawl run
///
/// `run` consumes the crawler, so each instance crawls exactly once.
pub struct Crawler<F = HttpFetcher> {
    workers: u32,
    pages_per_second: u32,
    ctx: Arc<CrawlContext<F>>,
}

impl Crawler<HttpFetcher> {
    /// Creates a crawler that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `cancel` - Token that stops the crawl when cancelled
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: &Config, cancel: CancellationToken) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::from_config(&config.user_agent)?;
        Ok(Self::with_fetcher(config, fetcher, cancel))
    }
}

impl<F: Fetcher> Crawler<F> {
    /// Creates a crawler that fetches documents through `fetcher`
    pub fn with_fetcher(config: &Config, fetcher: F, cancel: CancellationToken) -> Self {
        let crawler = &config.crawler;

        let ctx = CrawlContext {
            frontier: Frontier::new(crawler.queue_capacity(), cancel.clone()),
            limiter: RateLimiter::per_second(crawler.pages_per_second),
            fetcher,
            patterns: ReferencePatterns::from_config(&config.references),
            stats: CrawlStats::new(),
            cancel,
            idle_timeout: crawler.idle_timeout(),
            crawl_timeout: crawler.crawl_timeout(),
        };

        Self {
            workers: crawler.workers.max(1),
            pages_per_second: crawler.pages_per_second,
            ctx: Arc::new(ctx),
        }
    }

    /// The fetcher this crawler uses
    pub fn fetcher(&self) -> &F {
        &self.ctx.fetcher
    }

    /// Crawls everything reachable from `seed` and reports what happened
    ///
    /// Returns once every worker has exited, either because no work arrived for the idle
    /// timeout or because the cancellation token fired. Individual fetch failures and
    /// panicking workers are logged and never end the run early.
    pub async fn run(self, seed: impl Into<String>) -> CrawlSummary {
        let started_at = Utc::now();
        let seed = seed.into();
        let ctx = self.ctx;

        tracing::info!(
            "Starting crawl from {} with {} workers at {} pages/sec",
            seed,
            self.workers,
            self.pages_per_second
        );

        ctx.frontier.admit(seed.clone());

        let mut workers = JoinSet::new();
        for id in 0..self.workers as usize {
            workers.spawn(Worker::new(id, ctx.clone()).run());
        }

        let mut idle_expired_workers = 0;
        let mut cancelled_workers = 0;
        while let Some(result) = workers.join_next().await {
            match result {
                Ok(WorkerExit::IdleExpired) => idle_expired_workers += 1,
                Ok(WorkerExit::Cancelled) => cancelled_workers += 1,
                Err(e) => tracing::error!("Worker task failed: {}", CrawlError::from(e)),
            }
        }

        let summary = CrawlSummary {
            seed,
            visited: ctx.frontier.visited_urls(),
            fetched: ctx.stats.fetched(),
            failed: ctx.stats.failed(),
            timed_out: ctx.stats.timed_out(),
            references: ctx.stats.references(),
            queue_overflows: ctx.frontier.overflows(),
            idle_expired_workers,
            cancelled_workers,
            cancelled: ctx.cancel.is_cancelled(),
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl finished: {} documents visited, {} fetched, {} failed in {:?}",
            summary.visited.len(),
            summary.fetched,
            summary.failed,
            summary.elapsed()
        );

        summary
    }
}
