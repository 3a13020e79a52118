use crate::mapper::fields::{require_fields, Fields, USER_FIELDS};
use crate::mapper::MapResult;
use crate::model::UserRecord;
use serde_json::Value;

/// Maps a user object (e.g. a `users/show` response or a post's `user`)
pub fn map_user(obj: &Value) -> MapResult<UserRecord> {
    require_fields(obj, "user", &USER_FIELDS)?;
    let f = Fields::new(obj, "user");

    Ok(UserRecord {
        id: f.int("id")?,
        name: f.string("name")?,
        gender: f.string("gender")?,
        province: f.string("province")?,
        city: f.string("city")?,
        location: f.string("location")?,
        description: f.string("description")?,
        verified: f.boolean("verified")?,
        followers_count: f.count("followers_count")?,
        friends_count: f.count("friends_count")?,
        statuses_count: f.count("statuses_count")?,
        bi_followers_count: f.count("bi_followers_count")?,
        profile_image_url: f.string("profile_image_url")?,
        friends: None,
    })
}
