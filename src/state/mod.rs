//! Per-task crawl state
//!
//! Everything a crawl needs to know about an in-flight request travels on the
//! request itself, never in shared storage.
//!
//! # Components
//!
//! - `CrawlTask`: target id, attempt counter, dedup-bypass flag and the
//!   crawl-specific stage (cursor or page plus the partially built parent)
//! - `Transition`: what a completed fetch produces (follow-up tasks, items)

mod task;
mod transition;

pub use task::CrawlTask;
pub use transition::{Transition, TransitionKind};
