//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns everything with a lifetime longer than one fetch:
//! the request queue, the pool of in-flight fetches, the output sink and the
//! run statistics. Each completed fetch is handed to the spider, whose
//! transition tells the coordinator what to emit and what to fetch next.

use crate::crawler::fetcher::Fetch;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::spider::{Reply, Spider};
use crate::model::Item;
use crate::output::{CrawlStatistics, ItemSink};
use crate::state::{CrawlTask, Transition, TransitionKind};
use crate::SpiderError;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Default number of fetches in flight at once
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// How often (in completed fetches) progress is logged
const PROGRESS_INTERVAL: u64 = 100;

/// Main crawler coordinator structure
pub struct Coordinator<S: Spider, F: Fetch, K: ItemSink> {
    spider: Arc<S>,
    fetcher: Arc<F>,
    sink: K,
    scheduler: Scheduler<S::Stage>,
    max_in_flight: usize,
    shutdown: CancellationToken,
    stats: CrawlStatistics,
}

impl<S, F, K> Coordinator<S, F, K>
where
    S: Spider,
    F: Fetch + 'static,
    K: ItemSink,
{
    pub fn new(spider: S, fetcher: F, sink: K) -> Self {
        let stats = CrawlStatistics::new(spider.name());
        Self {
            spider: Arc::new(spider),
            fetcher: Arc::new(fetcher),
            sink,
            scheduler: Scheduler::new(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            shutdown: CancellationToken::new(),
            stats,
        }
    }

    /// Sets the maximum number of concurrent fetches (at least one)
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Uses an externally owned token, so the run can be stopped from outside
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Token that stops the run; cancelled by the coordinator on a fatal error
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Runs the crawl over `seeds` until the queue drains
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every task finished, or the run was stopped from outside
    /// * `Err(SpiderError::FatalApiError)` - The API rejected the access token;
    ///   nothing further was issued and in-flight fetches were discarded
    /// * `Err(SpiderError::Output)` - The sink failed
    pub async fn run(&mut self, seeds: &[String]) -> Result<(), SpiderError> {
        tracing::info!(
            "Starting {} crawl with {} seeds ({} requests in flight)",
            self.spider.name(),
            seeds.len(),
            self.max_in_flight
        );

        self.stats.started_at = Some(Utc::now());
        self.stats.seeds = seeds.len() as u64;

        for seed in seeds {
            let task = self.spider.start(seed);
            self.schedule(task);
        }

        let result = self.drive().await;

        self.stats.filtered = self.scheduler.filtered_count();
        self.stats.finished_at = Some(Utc::now());
        let flushed = self.sink.flush();

        match &result {
            Ok(()) => tracing::info!(
                "Crawl {}: {} requests, {} retries, {} dropped, {} items emitted",
                self.stats.status(),
                self.stats.requests,
                self.stats.retries,
                self.stats.dropped,
                self.stats.items_emitted()
            ),
            Err(e) => tracing::error!("Crawl aborted after {} requests: {}", self.stats.requests, e),
        }

        result?;
        flushed?;
        Ok(())
    }

    async fn drive(&mut self) -> Result<(), SpiderError> {
        let shutdown = self.shutdown.clone();
        let mut in_flight: JoinSet<(CrawlTask<S::Stage>, Reply)> = JoinSet::new();
        let mut completed: u64 = 0;

        loop {
            if shutdown.is_cancelled() {
                self.interrupt(&mut in_flight);
                return Ok(());
            }

            while in_flight.len() < self.max_in_flight {
                let Some(queued) = self.scheduler.next() else {
                    break;
                };

                tracing::debug!(
                    "Fetching {} (target {}, attempt {})",
                    queued.request,
                    queued.task.target_id,
                    queued.task.attempt
                );
                self.stats.requests += 1;

                let fetcher = Arc::clone(&self.fetcher);
                in_flight.spawn(async move {
                    let reply = fetcher.fetch(&queued.request).await;
                    (queued.task, reply)
                });
            }

            if in_flight.is_empty() {
                tracing::info!("Request queue is empty, crawl complete");
                return Ok(());
            }

            let joined = tokio::select! {
                biased;
                _ = shutdown.cancelled() => None,
                joined = in_flight.join_next() => Some(joined),
            };

            let Some(joined) = joined else {
                self.interrupt(&mut in_flight);
                return Ok(());
            };

            let (task, reply) = match joined {
                Some(Ok(done)) => done,
                Some(Err(e)) => {
                    tracing::error!("Fetch task failed to complete: {}", e);
                    self.stats.dropped += 1;
                    continue;
                }
                None => continue,
            };

            match self.spider.on_response(task, reply) {
                Ok(transition) => self.apply(transition)?,
                Err(e) => {
                    if e.is_fatal_api_error() {
                        shutdown.cancel();
                        in_flight.abort_all();
                        let discarded = self.scheduler.clear() + in_flight.len();
                        tracing::error!(
                            "Fatal API error, stopping crawl; {} pending requests discarded",
                            discarded
                        );
                        self.stats.aborted = true;
                    }
                    return Err(e);
                }
            }

            completed += 1;
            if completed % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} responses handled, {} queued, {} in flight, {} items emitted",
                    completed,
                    self.scheduler.len(),
                    in_flight.len(),
                    self.stats.items_emitted()
                );
            }
        }
    }

    fn interrupt(&mut self, in_flight: &mut JoinSet<(CrawlTask<S::Stage>, Reply)>) {
        in_flight.abort_all();
        let discarded = self.scheduler.clear() + in_flight.len();
        tracing::warn!("Crawl interrupted; {} pending requests discarded", discarded);
        self.stats.interrupted = true;
    }

    fn apply(&mut self, transition: Transition<S::Stage>) -> Result<(), SpiderError> {
        match transition.kind {
            TransitionKind::Retried => self.stats.retries += 1,
            TransitionKind::Dropped => self.stats.dropped += 1,
            TransitionKind::Advanced | TransitionKind::Completed => {}
        }

        for item in &transition.items {
            self.emit(item)?;
        }

        for task in transition.tasks {
            self.schedule(task);
        }

        Ok(())
    }

    fn emit(&mut self, item: &Item) -> Result<(), SpiderError> {
        tracing::debug!("Emitting {} {}", item.kind(), item.id());
        self.sink.write(item)?;
        match item {
            Item::User(_) => self.stats.users_emitted += 1,
            Item::Post(_) => self.stats.posts_emitted += 1,
        }
        Ok(())
    }

    fn schedule(&mut self, task: CrawlTask<S::Stage>) {
        let request = self.spider.request(&task);
        self.scheduler.enqueue(request, task);
    }
}
