//! Request queue for the crawl frontier
//!
//! This module handles:
//! - FIFO ordering of pending tasks
//! - Deduplication of requests by fingerprint
//! - Letting retried tasks through the duplicate filter

use crate::api::ApiRequest;
use crate::state::CrawlTask;
use std::collections::{HashSet, VecDeque};

/// A task waiting to be fetched, with the request it stands for
#[derive(Debug, Clone)]
pub struct QueuedTask<S> {
    pub request: ApiRequest,
    pub task: CrawlTask<S>,
}

/// Scheduler holds the pending tasks of a crawl
///
/// Every request that passes through is remembered by fingerprint. A request
/// seen before is dropped unless its task asks to bypass the filter, which is
/// how retries of the same logical request get re-issued.
#[derive(Debug)]
pub struct Scheduler<S> {
    queue: VecDeque<QueuedTask<S>>,
    seen: HashSet<String>,
    filtered: u64,
}

impl<S> Default for Scheduler<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Scheduler<S> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            filtered: 0,
        }
    }

    /// Adds a task to the back of the queue
    ///
    /// # Returns
    ///
    /// `false` if the request was a duplicate and has been filtered out
    pub fn enqueue(&mut self, request: ApiRequest, task: CrawlTask<S>) -> bool {
        let fresh = self.seen.insert(request.fingerprint());

        if !fresh && !task.dont_filter {
            tracing::debug!("Filtered duplicate request: {}", request);
            self.filtered += 1;
            return false;
        }

        self.queue.push_back(QueuedTask { request, task });
        true
    }

    /// Takes the next task to fetch
    pub fn next(&mut self) -> Option<QueuedTask<S>> {
        self.queue.pop_front()
    }

    /// Number of tasks waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of requests dropped as duplicates so far
    pub fn filtered_count(&self) -> u64 {
        self.filtered
    }

    /// Discards every pending task; seen fingerprints are kept
    pub fn clear(&mut self) -> usize {
        let discarded = self.queue.len();
        self.queue.clear();
        discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints;

    #[test]
    fn test_new_scheduler() {
        let scheduler: Scheduler<()> = Scheduler::new();
        assert_eq!(scheduler.len(), 0);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let mut scheduler = Scheduler::new();
        scheduler.enqueue(endpoints::user_show("1"), CrawlTask::new("1", ()));
        scheduler.enqueue(endpoints::user_show("2"), CrawlTask::new("2", ()));

        assert_eq!(scheduler.next().unwrap().task.target_id, "1");
        assert_eq!(scheduler.next().unwrap().task.target_id, "2");
        assert!(scheduler.next().is_none());
    }

    #[test]
    fn test_duplicate_is_filtered() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.enqueue(endpoints::user_show("1"), CrawlTask::new("1", ())));
        assert!(!scheduler.enqueue(endpoints::user_show("1"), CrawlTask::new("1", ())));

        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.filtered_count(), 1);
    }

    #[test]
    fn test_duplicate_after_dequeue_is_filtered() {
        let mut scheduler = Scheduler::new();
        scheduler.enqueue(endpoints::status_show("5"), CrawlTask::new("5", ()));
        scheduler.next();

        assert!(!scheduler.enqueue(endpoints::status_show("5"), CrawlTask::new("5", ())));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_retry_bypasses_filter() {
        let mut scheduler = Scheduler::new();
        let task = CrawlTask::new("1", ());
        scheduler.enqueue(endpoints::user_show("1"), task.clone());
        scheduler.next();

        assert!(scheduler.enqueue(endpoints::user_show("1"), task.retried()));
        let queued = scheduler.next().unwrap();
        assert_eq!(queued.task.attempt, 1);
        assert_eq!(scheduler.filtered_count(), 0);
    }

    #[test]
    fn test_distinct_pages_are_not_duplicates() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.enqueue(endpoints::repost_timeline("9", 1), CrawlTask::new("9", ())));
        assert!(scheduler.enqueue(endpoints::repost_timeline("9", 2), CrawlTask::new("9", ())));
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut scheduler = Scheduler::new();
        scheduler.enqueue(endpoints::user_show("1"), CrawlTask::new("1", ()));
        scheduler.enqueue(endpoints::user_show("2"), CrawlTask::new("2", ()));

        assert_eq!(scheduler.clear(), 2);
        assert!(scheduler.is_empty());
    }
}
