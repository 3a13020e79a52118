//! weibo-spider: social-graph and repost-tree crawler for the Weibo API
//!
//! Given a seed set of user IDs or post IDs, the crawler fetches each primary
//! entity, walks the paginated collection attached to it (a user's friend IDs,
//! a post's reposts) and emits the assembled record once pagination resolves.

pub mod api;
pub mod config;
pub mod crawler;
pub mod mapper;
pub mod model;
pub mod output;
pub mod seeds;
pub mod state;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum SpiderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Seed source error: {0}")]
    Seeds(#[from] seeds::SeedError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    /// The API reported the access token as unusable; the whole run stops.
    #[error("API rejected the access token (error_code {code}): {message}")]
    FatalApiError { code: i64, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpiderError {
    /// Returns true if this error terminates the crawl because of bad credentials
    pub fn is_fatal_api_error(&self) -> bool {
        matches!(self, Self::FatalApiError { .. })
    }
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

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, SpiderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{Item, PostRecord, UserRecord};
pub use state::{CrawlTask, Transition};
