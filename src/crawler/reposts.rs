//! Repost tree crawl: post detail, then every page of its repost timeline
//!
//! The number of pages is fixed up front from the post's `reposts_count`.
//! Pages are walked in order, one logical request each. A page that comes back
//! empty is assumed to be a transient API hiccup and retried, as is a page
//! whose fetch failed; once its retries run out that page is skipped and the
//! walk moves on. The post is emitted
//! exactly once, after the last page is accounted for.

use crate::api::{endpoints, ApiRequest};
use crate::crawler::retry::{RetryDecision, RetryPolicy};
use crate::crawler::spider::{screen, Failure, Reply, Spider};
use crate::mapper::map_post;
use crate::model::PostRecord;
use crate::state::{CrawlTask, Transition};
use crate::SpiderError;
use serde_json::Value;

/// Where a repost-crawl task is in its chain
#[derive(Debug, Clone, PartialEq)]
pub enum RepostStage {
    /// Looking up the seed post
    SourcePost,

    /// Fetching repost page `page` of `total_pages`
    RepostPage {
        page: u32,
        total_pages: u32,
        source_post: PostRecord,
    },
}

/// Crawls a post together with all of its reposts
#[derive(Debug, Clone)]
pub struct RepostSpider {
    entity_retry: RetryPolicy,
    empty_page_retry: RetryPolicy,
}

impl Default for RepostSpider {
    fn default() -> Self {
        Self::new(RetryPolicy::entity(), RetryPolicy::empty_page())
    }
}

impl RepostSpider {
    pub fn new(entity_retry: RetryPolicy, empty_page_retry: RetryPolicy) -> Self {
        Self {
            entity_retry,
            empty_page_retry,
        }
    }

    fn on_source_post(&self, task: CrawlTask<()>, body: &Value) -> Transition<RepostStage> {
        let post = match map_post(body) {
            Ok(post) => post,
            Err(err) => return self.source_failed(task.with_stage(RepostStage::SourcePost), err.into()),
        };

        let total_pages = post.repost_pages(endpoints::REPOST_PAGE_SIZE);
        tracing::debug!(
            "Post {} has {} reposts over {} pages",
            post.id,
            post.reposts_count,
            total_pages
        );

        next_page(task, 0, total_pages, post)
    }

    fn source_failed(&self, task: CrawlTask<RepostStage>, failure: Failure) -> Transition<RepostStage> {
        match self.entity_retry.decide(task) {
            RetryDecision::Retry(task) => {
                tracing::debug!(
                    "Retrying post {} (attempt {}): {}",
                    task.target_id,
                    task.attempt,
                    failure
                );
                Transition::retry(task)
            }
            RetryDecision::GiveUp(task) => {
                tracing::warn!(
                    "Dropping post {} after {} failed attempts: {}",
                    task.target_id,
                    task.attempt + 1,
                    failure
                );
                Transition::drop_task()
            }
        }
    }

    /// Retries a failed repost page, or skips it once its ceiling is reached
    ///
    /// An empty page gets the empty-page ceiling; a transport failure counts
    /// as a shape failure and gets the entity ceiling.
    fn page_failed(&self, task: CrawlTask<RepostStage>, failure: Failure) -> Transition<RepostStage> {
        let policy = match failure {
            Failure::EmptyPage => self.empty_page_retry,
            Failure::Transport(_) | Failure::Shape(_) => self.entity_retry,
        };

        match policy.decide(task) {
            RetryDecision::Retry(task) => {
                tracing::debug!(
                    "Retrying repost page of post {} (attempt {}): {}",
                    task.target_id,
                    task.attempt,
                    failure
                );
                Transition::retry(task)
            }
            RetryDecision::GiveUp(task) => {
                let (task, stage) = task.split();
                match stage {
                    RepostStage::RepostPage {
                        page,
                        total_pages,
                        source_post,
                    } => {
                        tracing::warn!(
                            "Skipping repost page {}/{} of post {} after {} failed attempts: {}",
                            page,
                            total_pages,
                            task.target_id,
                            task.attempt + 1,
                            failure
                        );
                        next_page(task, page, total_pages, source_post).after_drop()
                    }
                    RepostStage::SourcePost => Transition::drop_task(),
                }
            }
        }
    }
}

/// Continues after `page`: the following page, or the finished post
fn next_page(
    task: CrawlTask<()>,
    page: u32,
    total_pages: u32,
    source_post: PostRecord,
) -> Transition<RepostStage> {
    if page >= total_pages {
        tracing::debug!(
            "Post {} complete with {} reposts",
            source_post.id,
            source_post.reposts.len()
        );
        return Transition::emit(source_post);
    }

    Transition::follow(task.advance(RepostStage::RepostPage {
        page: page + 1,
        total_pages,
        source_post,
    }))
}

/// Maps every repost on a page, skipping entries that fail to map
///
/// Returns `None` when the page carries no reposts at all.
fn map_repost_page(body: &Value) -> Option<Vec<PostRecord>> {
    let entries = body.get("reposts")?.as_array()?;
    if entries.is_empty() {
        return None;
    }

    let reposts = entries
        .iter()
        .filter_map(|entry| match map_post(entry) {
            Ok(post) => Some(post),
            Err(err) => {
                tracing::debug!("Skipping malformed repost: {}", err);
                None
            }
        })
        .collect();

    Some(reposts)
}

impl Spider for RepostSpider {
    type Stage = RepostStage;

    fn name(&self) -> &'static str {
        "repost_timeline"
    }

    fn seed_kind(&self) -> &'static str {
        "weiboids"
    }

    fn start(&self, seed: &str) -> CrawlTask<RepostStage> {
        CrawlTask::new(seed, RepostStage::SourcePost)
    }

    fn request(&self, task: &CrawlTask<RepostStage>) -> ApiRequest {
        match &task.stage {
            RepostStage::SourcePost => endpoints::status_show(&task.target_id),
            RepostStage::RepostPage { page, .. } => {
                endpoints::repost_timeline(&task.target_id, *page)
            }
        }
    }

    fn on_response(
        &self,
        task: CrawlTask<RepostStage>,
        reply: Reply,
    ) -> Result<Transition<RepostStage>, SpiderError> {
        let body = match screen(reply)? {
            Ok(body) => body,
            Err(failure) => {
                let transition = match task.stage {
                    RepostStage::SourcePost => self.source_failed(task, failure),
                    RepostStage::RepostPage { .. } => self.page_failed(task, failure),
                };
                return Ok(transition);
            }
        };

        let (task, stage) = task.split();
        let transition = match stage {
            RepostStage::SourcePost => self.on_source_post(task, &body),

            RepostStage::RepostPage {
                page,
                total_pages,
                mut source_post,
            } => match map_repost_page(&body) {
                Some(reposts) => {
                    source_post.reposts.extend(reposts);
                    next_page(task, page, total_pages, source_post)
                }
                None => self.page_failed(
                    task.with_stage(RepostStage::RepostPage {
                        page,
                        total_pages,
                        source_post,
                    }),
                    Failure::EmptyPage,
                ),
            },
        };

        Ok(transition)
    }
}
