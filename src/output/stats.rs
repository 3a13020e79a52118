//! Statistics gathered over one crawl run

use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Name of the crawl that ran
    pub spider: String,

    /// Seed ids the run started from
    pub seeds: u64,

    /// API requests issued
    pub requests: u64,

    /// Requests re-issued after a recoverable failure
    pub retries: u64,

    /// Requests given up after their retries ran out
    pub dropped: u64,

    /// Requests skipped as duplicates
    pub filtered: u64,

    /// Users emitted
    pub users_emitted: u64,

    /// Posts emitted
    pub posts_emitted: u64,

    /// The run was stopped from outside before finishing
    pub interrupted: bool,

    /// The run was aborted by a fatal API error
    pub aborted: bool,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStatistics {
    pub fn new(spider: impl Into<String>) -> Self {
        Self {
            spider: spider.into(),
            ..Self::default()
        }
    }

    /// Total records emitted
    pub fn items_emitted(&self) -> u64 {
        self.users_emitted + self.posts_emitted
    }

    /// Wall time of the run in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_seconds()),
            _ => None,
        }
    }

    /// Human-readable outcome
    pub fn status(&self) -> &'static str {
        if self.aborted {
            "aborted"
        } else if self.interrupted {
            "interrupted"
        } else {
            "completed"
        }
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout may be carrying the records themselves.
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Run:");
    eprintln!("  Spider: {}", stats.spider);
    eprintln!("  Status: {}", stats.status());
    if let Some(seconds) = stats.duration_seconds() {
        eprintln!("  Duration: {}s", seconds);
    }
    eprintln!();

    eprintln!("Requests:");
    eprintln!("  Seeds: {}", stats.seeds);
    eprintln!("  Issued: {}", stats.requests);
    eprintln!("  Retried: {}", stats.retries);
    eprintln!("  Dropped: {}", stats.dropped);
    eprintln!("  Filtered as duplicates: {}", stats.filtered);
    eprintln!();

    eprintln!("Records:");
    eprintln!("  Users: {}", stats.users_emitted);
    eprintln!("  Posts: {}", stats.posts_emitted);
}
