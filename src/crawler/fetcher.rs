//! HTTP fetcher implementation
//!
//! The crawl engine only needs one capability from the network: turn a URL into a
//! readable body or a failure. That capability is the `Fetcher` trait, so the engine can
//! be driven by the HTTP client in production and by in-memory documents in tests.
//!
//! `HttpFetcher` streams the response body instead of buffering it, so a worker only
//! ever holds one logical page of a document at a time.

use crate::config::UserAgentConfig;
use crate::FetchError;
use futures::TryStreamExt;
use reqwest::Client;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;
use tokio::io::AsyncBufRead;
use tokio_util::io::StreamReader;

/// A document body, read incrementally
pub type Body = Pin<Box<dyn AsyncBufRead + Send>>;

/// Retrieves documents by URL
pub trait Fetcher: Send + Sync + 'static {
    /// Starts fetching `url`
    ///
    /// Dropping the returned future (or the body) abandons the fetch.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Body, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", config.crawler_name, config.crawler_version);

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches documents over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl Fetcher for HttpFetcher {
    /// Sends a GET request and returns the streamed body
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Transport error (DNS, connect, TLS, timeout) | `FetchError::Request` |
    /// | Non-2xx status | `FetchError::Status` |
    /// | 2xx status | body stream |
    ///
    /// Errors while reading the stream later surface as `io::Error`s from the body.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Body, FetchError>> + Send {
        let request = self.client.get(url);
        let url = url.to_string();

        async move {
            let response = request.send().await.map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            let stream = response.bytes_stream().map_err(io::Error::other);
            let body: Body = Box::pin(StreamReader::new(stream));
            Ok(body)
        }
    }
}
