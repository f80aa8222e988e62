//! Output Sink Port
//!
//! Destinations for generated text (clipboard, downloaded file).

use thiserror::Error;

use crate::domain::ContentKind;

#[derive(Debug, Error)]
pub enum SinkError {
    /// Destination could not be reached (no clipboard, no display)
    #[error("Sink unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Sink IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SinkError {
    pub fn unavailable<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Unavailable(err.into())
    }
}

/// Fire-and-forget destination for generated text
///
/// Errors are reported for logging only; callers never fail a lifecycle on them.
pub trait OutputSink: Send + Sync {
    /// Short name for logs, e.g. "clipboard"
    fn name(&self) -> &str;

    /// Deliver `text`; `kind` is set for text generation output
    fn deliver(&self, text: &str, kind: Option<ContentKind>) -> Result<(), SinkError>;
}

/// File name used when downloading generated text
pub fn download_file_name(kind: Option<ContentKind>) -> String {
    match kind {
        Some(kind) => format!("generated-{}.txt", kind),
        None => "generated-analysis.txt".to_string(),
    }
}
