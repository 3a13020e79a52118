use crate::model::Item;
use crate::output::traits::{ItemSink, OutputResult};

/// Keeps emitted records in memory, mainly for dry runs and tests
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    items: Vec<Item>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemSink for MemorySink {
    fn write(&mut self, item: &Item) -> OutputResult<()> {
        self.items.push(item.clone());
        Ok(())
    }
}
