//! In-memory fetcher for exercising the crawl engine without a network

use crate::crawler::fetcher::{Body, Fetcher};
use crate::FetchError;
use std::collections::HashMap;
use std::future::Future;
use std::io::Cursor;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Serves documents from a map; unknown URLs answer 404
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    /// Every fetch takes `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `url` was requested
    pub fn hits(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == url)
            .count()
    }

    pub fn total_hits(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// When each fetch started, in call order
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Body, FetchError>> + Send {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));

        let page = self.pages.get(url).cloned();
        let delay = self.delay;
        let url = url.to_string();

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            match page {
                Some(text) => {
                    let body: Body = Box::pin(Cursor::new(text.into_bytes()));
                    Ok(body)
                }
                None => Err(FetchError::Status { url, status: 404 }),
            }
        }
    }
}

/// A one-page document citing each of `ids`
pub fn document_citing(ids: &[u32]) -> String {
    let citations: Vec<String> = ids.iter().map(|id| format!("[RFC {}]", id)).collect();
    format!(
        "Network Working Group\n\
         This memo refers to {}.\n\
         Author                    Informational                    [Page 1]\n",
        citations.join(", ")
    )
}
