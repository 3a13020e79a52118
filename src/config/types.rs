use crate::api::DEFAULT_BASE_URL;
use serde::Deserialize;

/// Main configuration structure for weibo-spider
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub seeds: SeedsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Weibo API access
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// API root every endpoint is resolved against
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// OAuth2 access token; `WEIBO_ACCESS_TOKEN` takes precedence when set
    #[serde(rename = "access-token", default)]
    pub access_token: Option<String>,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of API requests in flight at once
    #[serde(rename = "max-concurrent-requests", default = "default_max_concurrent")]
    pub max_concurrent_requests: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent(),
        }
    }
}

/// Retry ceilings for recoverable failures
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Retries after a malformed entity or cursor response
    #[serde(rename = "entity-max-retries", default = "default_entity_retries")]
    pub entity_max_retries: u32,

    /// Retries after a repost page with no items
    #[serde(rename = "empty-page-max-retries", default = "default_empty_page_retries")]
    pub empty_page_max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            entity_max_retries: default_entity_retries(),
            empty_page_max_retries: default_empty_page_retries(),
        }
    }
}

/// Where seed ids come from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedsConfig {
    /// Redis instance holding the seed sets
    #[serde(rename = "redis-url", default)]
    pub redis_url: Option<String>,

    /// Fixed seed ids, used instead of Redis when non-empty
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// JSON Lines file the records are appended to (`-` for stdout)
    #[serde(rename = "items-path", default = "default_items_path")]
    pub items_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            items_path: default_items_path(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent() -> u32 {
    8
}

fn default_entity_retries() -> u32 {
    crate::crawler::ENTITY_MAX_RETRIES
}

fn default_empty_page_retries() -> u32 {
    crate::crawler::EMPTY_PAGE_MAX_RETRIES
}

fn default_items_path() -> String {
    "-".to_string()
}
