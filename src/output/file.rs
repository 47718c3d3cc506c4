use std::fs;
use std::path::{Path, PathBuf};

use super::OutputSink;
use crate::ViewResult;

/// Rewrites a file with the latest block. The file is replaced through a
/// sibling temp file so readers never see a partial write.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> ViewResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn replace_text(&self, text: &str) -> ViewResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
