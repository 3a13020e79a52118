use crate::mapper::fields::{require_fields, Fields, POST_FIELDS};
use crate::mapper::{map_user, parse_created_at, MapError, MapResult};
use crate::model::PostRecord;
use serde_json::Value;

/// Maps a post object (a `statuses/show` response or one entry of a repost page)
///
/// The author comes from the embedded `user`. An embedded `retweeted_status`
/// is mapped as a nested record unless the API marks it `deleted`, in which
/// case it is left out entirely.
pub fn map_post(obj: &Value) -> MapResult<PostRecord> {
    let mut post = map_post_body(obj)?;

    if let Some(original) = obj.get("retweeted_status") {
        if !is_deleted(original) {
            post.retweeted_status = Some(Box::new(map_post_body(original)?));
        }
    }

    Ok(post)
}

fn map_post_body(obj: &Value) -> MapResult<PostRecord> {
    require_fields(obj, "post", &POST_FIELDS)?;
    let f = Fields::new(obj, "post");

    let created_at = f.string("created_at")?;
    let timestamp = parse_created_at(&created_at)?;

    let user = obj.get("user").ok_or(MapError::IncompleteEntity {
        entity: "post",
        field: "user",
    })?;

    Ok(PostRecord {
        created_at,
        timestamp,
        id: f.int("id")?,
        mid: f.string("mid")?,
        text: f.string("text")?,
        source: f.string("source")?,
        reposts_count: f.count("reposts_count")?,
        comments_count: f.count("comments_count")?,
        attitudes_count: f.count("attitudes_count")?,
        geo: f.optional_value("geo")?,
        user: map_user(user)?,
        reposts: Vec::new(),
        retweeted_status: None,
    })
}

fn is_deleted(obj: &Value) -> bool {
    obj.get("deleted").is_some()
}
