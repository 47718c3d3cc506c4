use parking_lot::Mutex;
use std::io::{self, Write};

use super::OutputSink;
use crate::ViewResult;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Redraws the block on a terminal, clearing the screen first.
pub struct TerminalSink {
    writer: Mutex<Box<dyn Write + Send>>,
    footer: Option<String>,
}

impl TerminalSink {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            footer: None,
        }
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

impl OutputSink for TerminalSink {
    fn name(&self) -> String {
        "terminal".to_string()
    }

    fn replace_text(&self, text: &str) -> ViewResult<()> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{}{}", CLEAR_SCREEN, text)?;
        if let Some(footer) = &self.footer {
            writeln!(writer, "\n{}", footer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_clears_before_each_block() {
        let buffer = SharedBuffer::default();
        let sink = TerminalSink::new(Box::new(buffer.clone())).with_footer("[enter] toggle");

        sink.replace_text("first").unwrap();
        sink.replace_text("second").unwrap();

        let written = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert_eq!(
            written,
            format!(
                "{0}first\n\n[enter] toggle\n{0}second\n\n[enter] toggle\n",
                CLEAR_SCREEN
            )
        );
    }
}
