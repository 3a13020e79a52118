//! Required-field lists and typed field extraction

use crate::mapper::{MapError, MapResult};
use serde_json::Value;

/// Fields every post (status) response must carry
pub const POST_FIELDS: [&str; 9] = [
    "created_at",
    "id",
    "mid",
    "text",
    "source",
    "reposts_count",
    "comments_count",
    "attitudes_count",
    "geo",
];

/// Fields every user object must carry
pub const USER_FIELDS: [&str; 13] = [
    "id",
    "name",
    "gender",
    "province",
    "city",
    "location",
    "description",
    "verified",
    "followers_count",
    "statuses_count",
    "friends_count",
    "profile_image_url",
    "bi_followers_count",
];

/// Checks that every field in `required` is present on `obj`
///
/// A present key with a `null` value counts as present.
pub fn require_fields(
    obj: &Value,
    entity: &'static str,
    required: &[&'static str],
) -> MapResult<()> {
    for &field in required {
        if obj.get(field).is_none() {
            return Err(MapError::IncompleteEntity { entity, field });
        }
    }
    Ok(())
}

/// Typed accessor over a JSON object whose required fields were checked
pub struct Fields<'a> {
    obj: &'a Value,
    entity: &'static str,
}

impl<'a> Fields<'a> {
    pub fn new(obj: &'a Value, entity: &'static str) -> Self {
        Self { obj, entity }
    }

    pub fn raw(&self, field: &'static str) -> MapResult<&'a Value> {
        self.obj.get(field).ok_or(MapError::IncompleteEntity {
            entity: self.entity,
            field,
        })
    }

    fn malformed(&self, field: &'static str, expected: &'static str) -> MapError {
        MapError::MalformedField {
            entity: self.entity,
            field,
            expected,
        }
    }

    /// Strings are taken as-is; numbers are rendered (the API mixes both for
    /// province/city codes and `mid`)
    pub fn string(&self, field: &'static str) -> MapResult<String> {
        match self.raw(field)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Null => Ok(String::new()),
            _ => Err(self.malformed(field, "string")),
        }
    }

    /// Integers, also accepted in their string form
    pub fn int(&self, field: &'static str) -> MapResult<i64> {
        match self.raw(field)? {
            Value::Number(n) => n.as_i64().ok_or_else(|| self.malformed(field, "integer")),
            Value::String(s) => s.parse().map_err(|_| self.malformed(field, "integer")),
            _ => Err(self.malformed(field, "integer")),
        }
    }

    pub fn count(&self, field: &'static str) -> MapResult<u64> {
        let value = self.int(field)?;
        u64::try_from(value).map_err(|_| self.malformed(field, "count"))
    }

    pub fn boolean(&self, field: &'static str) -> MapResult<bool> {
        match self.raw(field)? {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) if n.as_i64() == Some(0) => Ok(false),
            Value::Number(n) if n.as_i64() == Some(1) => Ok(true),
            _ => Err(self.malformed(field, "boolean")),
        }
    }

    /// The raw value, `None` for `null`
    pub fn optional_value(&self, field: &'static str) -> MapResult<Option<Value>> {
        match self.raw(field)? {
            Value::Null => Ok(None),
            value => Ok(Some(value.clone())),
        }
    }
}
