//! The crawl state machine interface
//!
//! A spider decides, for each completed fetch, what happens next. It never
//! performs I/O and never waits: the coordinator issues the requests it
//! describes and feeds the replies back in.

use crate::api::ApiRequest;
use crate::crawler::fetcher::FetchError;
use crate::mapper::{fatal_error, MapError};
use crate::seeds::seed_key;
use crate::state::{CrawlTask, Transition};
use crate::SpiderError;
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;

/// Raw outcome of one fetch as seen by a spider
pub type Reply = Result<Value, FetchError>;

/// Recoverable reasons a fetch did not yield usable data
#[derive(Debug, Error)]
pub enum Failure {
    #[error("transport failure: {0}")]
    Transport(#[from] FetchError),

    #[error("shape failure: {0}")]
    Shape(#[from] MapError),

    #[error("page reported no items")]
    EmptyPage,
}

/// A crawl: how a seed id expands into a chain of dependent fetches
pub trait Spider: Send + Sync + 'static {
    /// Crawl-specific task stage (cursor or page plus the parent record)
    type Stage: Debug + Send + 'static;

    /// Crawl name, also the first half of the seed key
    fn name(&self) -> &'static str;

    /// Kind of ids the crawl is seeded with
    fn seed_kind(&self) -> &'static str;

    /// Key of the seed set in the seed store: `{name}:{seed_kind}`
    fn seed_key(&self) -> String {
        seed_key(self.name(), self.seed_kind())
    }

    /// First task for a seed id
    fn start(&self, seed: &str) -> CrawlTask<Self::Stage>;

    /// The API call a task stands for
    fn request(&self, task: &CrawlTask<Self::Stage>) -> ApiRequest;

    /// Advances a task with the reply to its request
    ///
    /// Recoverable failures are handled inside (retry or silent drop). The
    /// only error is `SpiderError::FatalApiError`, which ends the whole run.
    fn on_response(
        &self,
        task: CrawlTask<Self::Stage>,
        reply: Reply,
    ) -> Result<Transition<Self::Stage>, SpiderError>;
}

/// Screens a reply for a fatal API error before any mapping happens
///
/// Transport failures are passed on as recoverable failures.
pub fn screen(reply: Reply) -> Result<Result<Value, Failure>, SpiderError> {
    match reply {
        Ok(body) => match fatal_error(&body) {
            Some(err) => Err(SpiderError::FatalApiError {
                code: err.code,
                message: err.message,
            }),
            None => Ok(Ok(body)),
        },
        Err(err) => Ok(Err(Failure::Transport(err))),
    }
}
