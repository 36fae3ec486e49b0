//! Output module for reporting crawl results
//!
//! Crawl results are not persisted; a run ends with a summary printed to stdout.

mod stats;

pub use stats::{print_summary, CrawlStats, CrawlSummary};
