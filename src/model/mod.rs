//! Record types produced by the crawler
//!
//! - `UserRecord`: a user profile, optionally carrying the user's friend IDs
//! - `PostRecord`: a post with its author, reposts and reposted original
//! - `Item`: the value handed to an output sink

mod post;
mod user;

pub use post::PostRecord;
pub use user::UserRecord;

use serde::{Deserialize, Serialize};

/// A fully assembled record ready for emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    User(UserRecord),
    Post(PostRecord),
}

impl Item {
    /// Returns the API id of the record
    pub fn id(&self) -> i64 {
        match self {
            Self::User(user) => user.id,
            Self::Post(post) => post.id,
        }
    }

    /// Returns the record kind as used in the serialized `kind` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Post(_) => "post",
        }
    }
}

impl From<UserRecord> for Item {
    fn from(user: UserRecord) -> Self {
        Self::User(user)
    }
}

impl From<PostRecord> for Item {
    fn from(post: PostRecord) -> Self {
        Self::Post(post)
    }
}
