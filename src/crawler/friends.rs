//! Friend graph crawl: user profile, then every page of the user's friend ids

use crate::api::{endpoints, ApiRequest};
use crate::crawler::retry::{RetryDecision, RetryPolicy};
use crate::crawler::spider::{screen, Failure, Reply, Spider};
use crate::mapper::{map_id_page, map_user};
use crate::model::UserRecord;
use crate::state::{CrawlTask, Transition};
use crate::SpiderError;

/// Where a friends-crawl task is in its chain
#[derive(Debug, Clone, PartialEq)]
pub enum FriendsStage {
    /// Looking up the seed user's profile
    SourceUser,

    /// Walking the friend id list; `source_user` collects the ids so far
    FriendIds { cursor: i64, source_user: UserRecord },
}

/// Crawls a user's profile together with the full, ordered list of friend ids
#[derive(Debug, Clone, Default)]
pub struct FriendsSpider {
    entity_retry: RetryPolicy,
}

impl FriendsSpider {
    pub fn new(entity_retry: RetryPolicy) -> Self {
        Self { entity_retry }
    }

    fn fail(&self, task: CrawlTask<FriendsStage>, failure: Failure) -> Transition<FriendsStage> {
        match self.entity_retry.decide(task) {
            RetryDecision::Retry(task) => {
                tracing::debug!(
                    "Retrying {} for uid {} (attempt {}): {}",
                    stage_label(&task.stage),
                    task.target_id,
                    task.attempt,
                    failure
                );
                Transition::retry(task)
            }
            RetryDecision::GiveUp(task) => {
                tracing::warn!(
                    "Dropping uid {} after {} failed attempts at {}: {}",
                    task.target_id,
                    task.attempt + 1,
                    stage_label(&task.stage),
                    failure
                );
                Transition::drop_task()
            }
        }
    }
}

fn stage_label(stage: &FriendsStage) -> String {
    match stage {
        FriendsStage::SourceUser => "user lookup".to_string(),
        FriendsStage::FriendIds { cursor, .. } => format!("friend ids cursor {}", cursor),
    }
}

impl Spider for FriendsSpider {
    type Stage = FriendsStage;

    fn name(&self) -> &'static str {
        "friends_uids"
    }

    fn seed_kind(&self) -> &'static str {
        "uids_for_friends"
    }

    fn start(&self, seed: &str) -> CrawlTask<FriendsStage> {
        CrawlTask::new(seed, FriendsStage::SourceUser)
    }

    fn request(&self, task: &CrawlTask<FriendsStage>) -> ApiRequest {
        match &task.stage {
            FriendsStage::SourceUser => endpoints::user_show(&task.target_id),
            FriendsStage::FriendIds { cursor, .. } => {
                endpoints::friend_ids(&task.target_id, *cursor)
            }
        }
    }

    fn on_response(
        &self,
        task: CrawlTask<FriendsStage>,
        reply: Reply,
    ) -> Result<Transition<FriendsStage>, SpiderError> {
        let body = match screen(reply)? {
            Ok(body) => body,
            Err(failure) => return Ok(self.fail(task, failure)),
        };

        let (task, stage) = task.split();
        let transition = match stage {
            FriendsStage::SourceUser => match map_user(&body) {
                Ok(mut user) => {
                    user.friends = Some(Vec::new());
                    Transition::follow(task.advance(FriendsStage::FriendIds {
                        cursor: 0,
                        source_user: user,
                    }))
                }
                Err(err) => self.fail(task.with_stage(FriendsStage::SourceUser), err.into()),
            },

            FriendsStage::FriendIds {
                cursor,
                mut source_user,
            } => match map_id_page(&body) {
                Ok(page) => {
                    let last = page.is_last();
                    let next_cursor = page.next_cursor;
                    source_user.extend_friends(page.ids);

                    if last {
                        tracing::debug!(
                            "Friend ids complete for uid {} ({} ids)",
                            task.target_id,
                            source_user.friends.as_ref().map_or(0, Vec::len)
                        );
                        Transition::emit(source_user)
                    } else {
                        Transition::follow(task.advance(FriendsStage::FriendIds {
                            cursor: next_cursor,
                            source_user,
                        }))
                    }
                }
                Err(err) => self.fail(
                    task.with_stage(FriendsStage::FriendIds {
                        cursor,
                        source_user,
                    }),
                    err.into(),
                ),
            },
        };

        Ok(transition)
    }
}
