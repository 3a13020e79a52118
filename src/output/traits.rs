//! Output sink trait and errors
//!
//! A sink receives finished records in emission order. Parents reach the sink
//! only once their pagination is resolved; dropped requests never do.

use crate::model::Item;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for emitted records
pub trait ItemSink: Send {
    /// Records one finished item
    fn write(&mut self, item: &Item) -> OutputResult<()>;

    /// Pushes buffered records to their destination
    fn flush(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

impl<T: ItemSink + ?Sized> ItemSink for Box<T> {
    fn write(&mut self, item: &Item) -> OutputResult<()> {
        (**self).write(item)
    }

    fn flush(&mut self) -> OutputResult<()> {
        (**self).flush()
    }
}
