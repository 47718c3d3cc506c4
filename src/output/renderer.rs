use log::{trace, warn};
use std::sync::Arc;

use super::OutputSink;

/// Writes a block into every registered sink, replacing what was there.
#[derive(Clone, Default)]
pub struct Renderer {
    sinks: Vec<Arc<dyn OutputSink>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn register_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn render(&self, text: &str) {
        for sink in &self.sinks {
            trace!("Rendering {} bytes into {}", text.len(), sink.name());
            if let Err(e) = sink.replace_text(text) {
                warn!("Failed to render into {}: {}", sink.name(), e);
            }
        }
    }
}
