use serde::{Deserialize, Serialize};

/// A Weibo user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub province: String,
    pub city: String,
    pub location: String,
    pub description: String,
    pub verified: bool,
    pub followers_count: u64,
    pub friends_count: u64,
    pub statuses_count: u64,
    pub bi_followers_count: u64,
    pub profile_image_url: String,

    /// Friend IDs in API order; only set by the friends crawl
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friends: Option<Vec<i64>>,
}

impl UserRecord {
    /// Appends a batch of friend IDs, starting the list if needed
    pub fn extend_friends(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.friends.get_or_insert_with(Vec::new).extend(ids);
    }
}
