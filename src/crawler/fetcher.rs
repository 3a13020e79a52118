//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building HTTP clients with proper user agent strings
//! - Resolving API requests against the configured root
//! - Decoding JSON bodies, including API error bodies sent with non-2xx codes
//!
//! Nothing here retries. A failed fetch goes back to the spider, which owns
//! the retry policy.

use crate::api::{parse_base_url, ApiRequest};
use crate::config::{ApiConfig, UserAgentConfig};
use crate::mapper::api_error;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Transport-level failure of one fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("response body is not JSON: {0}")]
    Body(String),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Performs API requests on behalf of the coordinator
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches one request and returns its decoded JSON body
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use weibo_spider::config::UserAgentConfig;
/// use weibo_spider::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "WeiboSpider".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent(config))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Format: CrawlerName/Version (+ContactEmail)
pub fn user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_email
    )
}

/// `Fetch` over reqwest against the Weibo API
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpFetcher {
    pub fn new(client: Client, base_url: Url, access_token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            access_token,
        }
    }

    /// Builds a fetcher from the `[api]` and `[user-agent]` sections
    pub fn from_config(
        api: &ApiConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, crate::SpiderError> {
        let client = build_http_client(user_agent, Duration::from_secs(api.timeout_secs))?;
        let base_url = parse_base_url(&api.base_url)?;
        Ok(Self::new(client, base_url, api.access_token.clone()))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, FetchError> {
        let url = request.to_url(&self.base_url, self.access_token.as_deref())?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::trace!("{} -> HTTP {}", request, status.as_u16());

        match serde_json::from_str::<Value>(&text) {
            Ok(body) if status.is_success() => Ok(body),
            // The API reports token problems with 4xx codes and an error body;
            // pass it through so fatal codes are recognized.
            Ok(body) if api_error(&body).is_some() => Ok(body),
            Ok(_) => Err(FetchError::Status(status.as_u16())),
            Err(_) if !status.is_success() => Err(FetchError::Status(status.as_u16())),
            Err(e) => Err(FetchError::Body(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config(), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            user_agent(&create_test_config()),
            "TestCrawler/1.0 (+admin@example.com)"
        );
    }

    #[test]
    fn test_from_config_normalizes_base_url() {
        let api = ApiConfig {
            base_url: "http://127.0.0.1:9000/2".to_string(),
            access_token: Some("tok".to_string()),
            timeout_secs: 5,
        };
        let fetcher = HttpFetcher::from_config(&api, &create_test_config()).unwrap();
        assert_eq!(fetcher.base_url().as_str(), "http://127.0.0.1:9000/2/");
    }

    // Response handling is exercised with wiremock in the integration tests
}
