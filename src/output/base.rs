use crate::ViewResult;

/// A place the status block is displayed. Every write replaces the whole text.
pub trait OutputSink: Send + Sync {
    fn name(&self) -> String;
    fn replace_text(&self, text: &str) -> ViewResult<()>;
}
