//! Endpoints used by the two crawls

use crate::api::ApiRequest;

/// Single user profile by uid
pub const USER_SHOW: &str = "users/show.json";

/// Cursor-paginated friend uids of a user
pub const FRIEND_IDS: &str = "friendships/friends/ids.json";

/// Single post by id
pub const STATUS_SHOW: &str = "statuses/show.json";

/// Page-indexed reposts of a post
pub const REPOST_TIMELINE: &str = "statuses/repost_timeline.json";

/// Friend uids requested per cursor step
pub const FRIEND_IDS_PAGE_SIZE: u32 = 5000;

/// Reposts requested per page
pub const REPOST_PAGE_SIZE: u32 = 200;

pub fn user_show(uid: &str) -> ApiRequest {
    ApiRequest::new(USER_SHOW).param("uid", uid)
}

pub fn friend_ids(uid: &str, cursor: i64) -> ApiRequest {
    ApiRequest::new(FRIEND_IDS)
        .param("uid", uid)
        .param("cursor", cursor)
        .param("count", FRIEND_IDS_PAGE_SIZE)
}

pub fn status_show(id: &str) -> ApiRequest {
    ApiRequest::new(STATUS_SHOW).param("id", id)
}

pub fn repost_timeline(id: &str, page: u32) -> ApiRequest {
    ApiRequest::new(REPOST_TIMELINE)
        .param("id", id)
        .param("page", page)
        .param("count", REPOST_PAGE_SIZE)
}
