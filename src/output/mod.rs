//! Output module for crawled records and run statistics
//!
//! This module handles:
//! - The `ItemSink` interface records are emitted through
//! - JSON Lines export to a file or stdout
//! - Statistics of a crawl run

mod jsonl;
mod memory;
pub mod stats;
mod traits;

pub use jsonl::JsonLinesSink;
pub use memory::MemorySink;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{ItemSink, OutputError, OutputResult};
