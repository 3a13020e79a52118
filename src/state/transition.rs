use crate::model::Item;
use crate::state::CrawlTask;

/// How a completed fetch moved its task along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// The fetch succeeded and the crawl continues with follow-up tasks
    Advanced,

    /// The fetch failed and the same request was re-issued
    Retried,

    /// The fetch failed past its retry ceiling; its data is lost
    Dropped,

    /// The entity is fully assembled and emitted
    Completed,
}

/// Result of feeding one response into a crawl
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    pub kind: TransitionKind,

    /// Tasks to schedule next
    pub tasks: Vec<CrawlTask<S>>,

    /// Records to hand to the output sink
    pub items: Vec<Item>,
}

impl<S> Transition<S> {
    /// Continue with `task`
    pub fn follow(task: CrawlTask<S>) -> Self {
        Self {
            kind: TransitionKind::Advanced,
            tasks: vec![task],
            items: Vec::new(),
        }
    }

    /// Re-issue the request described by `task`
    pub fn retry(task: CrawlTask<S>) -> Self {
        Self {
            kind: TransitionKind::Retried,
            tasks: vec![task],
            items: Vec::new(),
        }
    }

    /// Emit a finished record; the task ends here
    pub fn emit(item: impl Into<Item>) -> Self {
        Self {
            kind: TransitionKind::Completed,
            tasks: Vec::new(),
            items: vec![item.into()],
        }
    }

    /// End the task without output
    pub fn drop_task() -> Self {
        Self {
            kind: TransitionKind::Dropped,
            tasks: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Marks this transition as having lost the data of the failed request
    ///
    /// Used when a pagination step gives up on one page but still continues
    /// with the next one (or emits the parent).
    pub fn after_drop(mut self) -> Self {
        self.kind = TransitionKind::Dropped;
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.tasks.is_empty()
    }
}
