//! Crawler module: the crawl engine
//!
//! This module contains the core crawling logic, including:
//! - Streaming document fetches behind the `Fetcher` trait
//! - Citation extraction from paginated plain text
//! - The global fetch-rate limiter
//! - The worker state machine and overall crawl coordination

mod coordinator;
mod fetcher;
mod limiter;
mod parser;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::Crawler;
pub use fetcher::{build_http_client, Body, Fetcher, HttpFetcher};
pub use limiter::{Admission, RateLimiter};
pub use parser::{scan_body, ReferenceExtractor, ReferencePatterns, ScanReport};
pub use worker::WorkerExit;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::CrawlError;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Admit the configured seed URL
/// 3. Run the worker pool until every worker idles out or `cancel` fires
/// 4. Return the run summary
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `cancel` - Token that stops the crawl when cancelled
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl finished, normally or after cancellation
/// * `Err(CrawlError)` - The crawl could not be started
pub async fn crawl(config: &Config, cancel: CancellationToken) -> Result<CrawlSummary, CrawlError> {
    let crawler = Crawler::new(config, cancel)?;
    Ok(crawler.run(config.crawler.seed_url.clone()).await)
}
