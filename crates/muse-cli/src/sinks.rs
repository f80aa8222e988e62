//! Output sinks: system clipboard and downloaded text files

use std::fs;
use std::path::PathBuf;

use muse_core::ports::download_file_name;
use muse_core::{ContentKind, OutputSink, SinkError};

/// Copies text to the system clipboard
pub struct ClipboardSink;

impl OutputSink for ClipboardSink {
    fn name(&self) -> &str {
        "clipboard"
    }

    fn deliver(&self, text: &str, _kind: Option<ContentKind>) -> Result<(), SinkError> {
        let mut clipboard = arboard::Clipboard::new().map_err(SinkError::unavailable)?;
        clipboard
            .set_text(text.to_string())
            .map_err(SinkError::unavailable)
    }
}

/// Writes text to `generated-{kind}.txt` in a directory
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn target(&self, kind: Option<ContentKind>) -> PathBuf {
        self.dir.join(download_file_name(kind))
    }
}

impl OutputSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn deliver(&self, text: &str, kind: Option<ContentKind>) -> Result<(), SinkError> {
        fs::create_dir_all(&self.dir)?;
        let target = self.target(kind);
        fs::write(&target, text)?;
        tracing::debug!(path = ?target, bytes = text.len(), "Wrote output file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_names_file_after_kind() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        sink.deliver("body", Some(ContentKind::Story)).unwrap();

        let written = fs::read_to_string(dir.path().join("generated-story.txt")).unwrap();
        assert_eq!(written, "body");
    }

    #[test]
    fn test_file_sink_reports_unwritable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let sink = FileSink::new(&blocker);
        assert!(matches!(sink.deliver("body", None), Err(SinkError::Io(_))));
    }
}
