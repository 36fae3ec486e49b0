use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub references: ReferenceConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Maximum number of fetches admitted per second across all workers
    #[serde(default = "default_pages_per_second")]
    pub pages_per_second: u32,

    /// How long a worker waits for queue traffic before retiring (milliseconds)
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    /// Upper bound on fetching and scanning a single document (seconds)
    #[serde(default = "default_crawl_timeout_secs")]
    pub crawl_timeout_secs: u64,

    /// Document the crawl starts from
    #[serde(default = "default_seed_url")]
    pub seed_url: String,
}

impl CrawlerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn crawl_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl_timeout_secs)
    }

    /// Capacity of the work queue: one second's worth of fetches for every worker
    pub fn queue_capacity(&self) -> usize {
        (self.workers as usize)
            .saturating_mul(self.pages_per_second as usize)
            .max(1)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            pages_per_second: default_pages_per_second(),
            idle_timeout_ms: default_idle_timeout_ms(),
            crawl_timeout_secs: default_crawl_timeout_secs(),
            seed_url: default_seed_url(),
        }
    }
}

/// Where cited documents live
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReferenceConfig {
    /// Prefix of every cited document URL; the document is `{base-url}rfc{id}.txt`
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(default = "default_crawler_version")]
    pub crawler_version: String,

    /// Upper bound on establishing a connection (seconds)
    ///
    /// Only connection setup is bounded here; reading a document is bounded by
    /// `crawl-timeout-secs`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_workers() -> u32 {
    1
}

fn default_pages_per_second() -> u32 {
    15
}

fn default_idle_timeout_ms() -> u64 {
    3_000
}

fn default_crawl_timeout_secs() -> u64 {
    5 * 60
}

fn default_seed_url() -> String {
    String::from("https://www.ietf.org/rfc/rfc1912.txt")
}

fn default_base_url() -> String {
    String::from("https://www.ietf.org/rfc/")
}

fn default_crawler_name() -> String {
    String::from(env!("CARGO_PKG_NAME"))
}

fn default_crawler_version() -> String {
    String::from(env!("CARGO_PKG_VERSION"))
}

fn default_connect_timeout_secs() -> u64 {
    10
}
