use crate::model::UserRecord;
use serde::{Deserialize, Serialize};

/// A Weibo post (status)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Creation time exactly as the API reported it
    pub created_at: String,

    /// Unix timestamp derived from `created_at`
    pub timestamp: i64,

    pub id: i64,

    /// Canonical message id
    pub mid: String,

    pub text: String,

    /// Client the post was published from
    pub source: String,

    pub reposts_count: u64,
    pub comments_count: u64,
    pub attitudes_count: u64,

    /// Raw geo object, `None` when the API reports `null`
    pub geo: Option<serde_json::Value>,

    /// Author of the post
    pub user: UserRecord,

    /// Reposts of this post, in page order
    #[serde(default)]
    pub reposts: Vec<PostRecord>,

    /// The post this one reposts, if it still exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweeted_status: Option<Box<PostRecord>>,
}

impl PostRecord {
    /// Number of repost pages needed to cover `reposts_count` at `page_size`
    pub fn repost_pages(&self, page_size: u32) -> u32 {
        let page_size = u64::from(page_size.max(1));
        u32::try_from(self.reposts_count.div_ceil(page_size)).unwrap_or(u32::MAX)
    }
}
