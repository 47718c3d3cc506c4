use parking_lot::RwLock;
use std::sync::Arc;

use super::OutputSink;
use crate::ViewResult;

/// Keeps the last rendered block in memory. Clones share the same text.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    text: Arc<RwLock<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.text.read().clone()
    }
}

impl OutputSink for MemorySink {
    fn name(&self) -> String {
        "memory".to_string()
    }

    fn replace_text(&self, text: &str) -> ViewResult<()> {
        *self.text.write() = text.to_string();
        Ok(())
    }
}
