//! rfc-crawler: a bounded-concurrency citation crawler
//!
//! This crate follows "[RFC nnnn]" citations between plain-text documents, fetching
//! every transitively reachable document exactly once under a global rate ceiling.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure to retrieve a single document
///
/// A fetch failure never aborts the crawl: the worker logs it and drops the URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("reading body of {url} failed: {source}")]
    Body {
        url: String,
        source: std::io::Error,
    },
}

impl FetchError {
    /// Returns the URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Request { url, .. } | Self::Status { url, .. } | Self::Body { url, .. } => url,
        }
    }
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, Fetcher, HttpFetcher};
pub use output::CrawlSummary;
pub use state::{Frontier, WorkerState};
pub use tokio_util::sync::CancellationToken;
