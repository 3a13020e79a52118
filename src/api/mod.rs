//! Weibo API request descriptions
//!
//! The crawl state machine never builds URLs itself. It describes each fetch
//! as an `ApiRequest` (endpoint path plus query parameters); the transport
//! resolves it against the configured base URL and attaches the access token.
//!
//! The request fingerprint, used for deduplication, deliberately leaves out
//! the base URL and the token.

pub mod endpoints;

pub use endpoints::{
    friend_ids, repost_timeline, status_show, user_show, FRIEND_IDS, FRIEND_IDS_PAGE_SIZE,
    REPOST_PAGE_SIZE, REPOST_TIMELINE, STATUS_SHOW, USER_SHOW,
};

use std::fmt;
use url::Url;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.weibo.com/2/";

/// A single API call: endpoint path relative to the API root plus query parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiRequest {
    /// Endpoint path, e.g. `users/show.json`
    pub endpoint: &'static str,

    /// Query parameters in insertion order
    pub params: Vec<(&'static str, String)>,
}

impl ApiRequest {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
        }
    }

    /// Adds a query parameter
    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.push((key, value.to_string()));
        self
    }

    /// Identity of the request for deduplication
    pub fn fingerprint(&self) -> String {
        self.to_string()
    }

    /// Resolves the request against an API root
    ///
    /// # Arguments
    ///
    /// * `base` - API root; must end with `/`
    /// * `access_token` - Token appended as the `access_token` parameter
    pub fn to_url(&self, base: &Url, access_token: Option<&str>) -> Result<Url, url::ParseError> {
        let mut url = base.join(self.endpoint)?;

        if !self.params.is_empty() || access_token.is_some() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &self.params {
                query.append_pair(key, value);
            }
            if let Some(token) = access_token {
                query.append_pair("access_token", token);
            }
        }

        Ok(url)
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.endpoint)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// Parses an API root, adding the trailing slash `Url::join` needs
pub fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
