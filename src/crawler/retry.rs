//! Bounded retry of failed fetches
//!
//! The attempt counter lives on the task. A failed fetch is re-issued with the
//! counter incremented and deduplication bypassed, until the ceiling is
//! exceeded; then the request is given up without output.

use crate::config::RetryConfig;
use crate::state::CrawlTask;

/// Retries allowed after a shape failure of an entity lookup
pub const ENTITY_MAX_RETRIES: u32 = 2;

/// Retries allowed after a repost page reports no items
pub const EMPTY_PAGE_MAX_RETRIES: u32 = 3;

/// What to do with a task whose fetch just failed
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision<S> {
    /// Re-issue this task (attempt incremented, dedup bypassed)
    Retry(CrawlTask<S>),

    /// The ceiling is reached; the task comes back unchanged
    GiveUp(CrawlTask<S>),
}

/// Retry ceiling for one class of recoverable failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Policy for malformed or incomplete entity responses
    pub const fn entity() -> Self {
        Self::new(ENTITY_MAX_RETRIES)
    }

    /// Policy for empty repost pages
    pub const fn empty_page() -> Self {
        Self::new(EMPTY_PAGE_MAX_RETRIES)
    }

    /// Both policies as configured
    pub fn from_config(config: &RetryConfig) -> (Self, Self) {
        (
            Self::new(config.entity_max_retries),
            Self::new(config.empty_page_max_retries),
        )
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total fetches of one logical request before it is given up
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Decides whether a failed task is re-issued or given up
    pub fn decide<S>(&self, task: CrawlTask<S>) -> RetryDecision<S> {
        if task.attempt >= self.max_retries {
            RetryDecision::GiveUp(task)
        } else {
            RetryDecision::Retry(task.retried())
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::entity()
    }
}
