//! Response validation and mapping
//!
//! This module turns raw API responses into typed records:
//! - Required-field lists for users and posts
//! - Typed field extraction with a single `IncompleteEntity` outcome for missing keys
//! - Derivation of the numeric timestamp from `created_at`
//! - Omission of reposted originals the API marks as deleted
//! - Cursor pages of friend ids
//! - Detection of fatal API error codes (unusable access token)

mod cursor;
mod fields;
mod post;
mod timestamp;
mod user;

pub use cursor::{map_id_page, IdPage, ID_PAGE_FIELDS};
pub use fields::{POST_FIELDS, USER_FIELDS};
pub use post::map_post;
pub use timestamp::{parse_created_at, CREATED_AT_FORMAT};
pub use user::map_user;

use serde_json::Value;
use thiserror::Error;

/// Error codes the API uses when the access token is used up, expired,
/// revoked or otherwise invalid
pub const FATAL_ERROR_CODES: [i64; 4] = [21314, 21315, 21316, 21317];

/// Shape failures raised while mapping a response
///
/// Every variant is recoverable: the caller routes it to the retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("{entity} is missing required field '{field}'")]
    IncompleteEntity {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity} field '{field}' is not a valid {expected}")]
    MalformedField {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Cannot parse timestamp '{0}'")]
    TimestampParseError(String),
}

/// Result type for mapping operations
pub type MapResult<T> = Result<T, MapError>;

/// An API-level error carried in a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

impl ApiError {
    /// Returns true if the code means the access token can no longer be used
    pub fn is_fatal(&self) -> bool {
        FATAL_ERROR_CODES.contains(&self.code)
    }
}

/// Extracts the `error_code`/`error` pair from a response, if present
pub fn api_error(resp: &Value) -> Option<ApiError> {
    let code = match resp.get("error_code")? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };

    let message = resp
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(ApiError { code, message })
}

/// Returns the API error if the response carries a fatal credential error code
pub fn fatal_error(resp: &Value) -> Option<ApiError> {
    api_error(resp).filter(ApiError::is_fatal)
}
