//! Crawler module: the crawl state machines and the async driver around them
//!
//! This module contains:
//! - The `Spider` trait and the two crawls (friends, reposts)
//! - The bounded retry policy
//! - Request scheduling with deduplication
//! - HTTP fetching
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod friends;
mod reposts;
mod retry;
mod scheduler;
mod spider;

pub use coordinator::{Coordinator, DEFAULT_MAX_IN_FLIGHT};
pub use fetcher::{build_http_client, user_agent, Fetch, FetchError, HttpFetcher};
pub use friends::{FriendsSpider, FriendsStage};
pub use reposts::{RepostSpider, RepostStage};
pub use retry::{RetryDecision, RetryPolicy, EMPTY_PAGE_MAX_RETRIES, ENTITY_MAX_RETRIES};
pub use scheduler::{QueuedTask, Scheduler};
pub use spider::{screen, Failure, Reply, Spider};

use crate::config::Config;
use crate::output::{CrawlStatistics, JsonLinesSink};
use crate::SpiderError;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP fetcher from the `[api]` and `[user-agent]` sections
/// 2. Open the JSON Lines output
/// 3. Fetch, walk pagination and emit records until the queue drains
///
/// # Arguments
///
/// * `spider` - The crawl to run
/// * `config` - The crawler configuration
/// * `seeds` - Seed ids (uids or post ids, depending on the crawl)
/// * `shutdown` - Cancelling it stops the run early (e.g. on Ctrl-C)
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl finished or was interrupted
/// * `Err(SpiderError)` - Crawl aborted (fatal API error, output failure)
pub async fn run_crawl<S: Spider>(
    spider: S,
    config: &Config,
    seeds: &[String],
    shutdown: CancellationToken,
) -> Result<CrawlStatistics, SpiderError> {
    let fetcher = HttpFetcher::from_config(&config.api, &config.user_agent)?;
    let sink = JsonLinesSink::open(&config.output.items_path)?;

    let mut coordinator = Coordinator::new(spider, fetcher, sink)
        .with_max_in_flight(config.crawler.max_concurrent_requests as usize)
        .with_shutdown(shutdown);

    coordinator.run(seeds).await?;
    Ok(coordinator.statistics().clone())
}

/// Friends crawl with the configured retry ceiling
pub fn friends_spider(config: &Config) -> FriendsSpider {
    let (entity, _) = RetryPolicy::from_config(&config.retry);
    FriendsSpider::new(entity)
}

/// Repost crawl with the configured retry ceilings
pub fn repost_spider(config: &Config) -> RepostSpider {
    let (entity, empty_page) = RetryPolicy::from_config(&config.retry);
    RepostSpider::new(entity, empty_page)
}
