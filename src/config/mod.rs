//! Configuration module for weibo-spider
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use weibo_spider::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("weibo.toml")).unwrap();
//! println!("Requests in flight: {}", config.crawler.max_concurrent_requests);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, Config, CrawlerConfig, OutputConfig, RetryConfig, SeedsConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, ACCESS_TOKEN_ENV,
};
