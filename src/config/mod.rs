//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use rfc_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, ReferenceConfig, UserAgentConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config, read_config};
pub use validation::validate;
