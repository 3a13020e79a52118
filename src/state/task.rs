/// One logical request of a crawl, plus everything needed to continue after it
///
/// `S` is the crawl-specific stage: which endpoint the task is at, its cursor
/// or page, and the parent record being assembled. A task is replaced, never
/// mutated in place, when the crawl moves on.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlTask<S> {
    /// Seed id the task belongs to (uid or post id)
    pub target_id: String,

    /// Failed attempts of this logical request so far
    pub attempt: u32,

    /// Bypass request deduplication (set on retries)
    pub dont_filter: bool,

    /// Crawl-specific stage
    pub stage: S,
}

impl<S> CrawlTask<S> {
    /// Creates the first attempt of a logical request
    pub fn new(target_id: impl Into<String>, stage: S) -> Self {
        Self {
            target_id: target_id.into(),
            attempt: 0,
            dont_filter: false,
            stage,
        }
    }

    /// Separates the stage from the request bookkeeping
    pub fn split(self) -> (CrawlTask<()>, S) {
        let CrawlTask {
            target_id,
            attempt,
            dont_filter,
            stage,
        } = self;

        (
            CrawlTask {
                target_id,
                attempt,
                dont_filter,
                stage: (),
            },
            stage,
        )
    }

    /// Same logical request, with `stage` put (back) in place
    pub fn with_stage<T>(self, stage: T) -> CrawlTask<T> {
        CrawlTask {
            target_id: self.target_id,
            attempt: self.attempt,
            dont_filter: self.dont_filter,
            stage,
        }
    }

    /// Moves to a different logical request for the same target
    ///
    /// The attempt counter starts over: it is never shared between distinct
    /// requests.
    pub fn advance<T>(self, stage: T) -> CrawlTask<T> {
        CrawlTask::new(self.target_id, stage)
    }

    /// Re-issues the same logical request with one more recorded failure
    pub fn retried(self) -> Self {
        Self {
            attempt: self.attempt + 1,
            dont_filter: true,
            ..self
        }
    }
}
