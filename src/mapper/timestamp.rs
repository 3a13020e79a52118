use crate::mapper::{MapError, MapResult};
use chrono::DateTime;

/// Format of `created_at` values, e.g. `Tue May 31 17:46:55 +0800 2011`
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Converts an API `created_at` string into a Unix timestamp (seconds)
pub fn parse_created_at(value: &str) -> MapResult<i64> {
    DateTime::parse_from_str(value, CREATED_AT_FORMAT)
        .map(|dt| dt.timestamp())
        .map_err(|_| MapError::TimestampParseError(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_created_at() {
        assert_eq!(
            parse_created_at("Tue May 31 17:46:55 +0800 2011").unwrap(),
            1306835215
        );
    }

    #[test]
    fn test_parse_created_at_rejects_garbage() {
        assert_eq!(
            parse_created_at("2011-05-31 17:46:55"),
            Err(MapError::TimestampParseError("2011-05-31 17:46:55".to_string()))
        );
        assert!(parse_created_at("").is_err());
    }
}
