pub mod base;
pub mod file;
pub mod memory;
pub mod renderer;
pub mod terminal;

pub use base::OutputSink;
pub use file::FileSink;
pub use memory::MemorySink;
pub use renderer::Renderer;
pub use terminal::TerminalSink;
