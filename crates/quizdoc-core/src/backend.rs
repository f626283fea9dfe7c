use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("backend `{0}` is not compiled into this build")]
    Unavailable(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// A backend is one probe in the fallback chain built by
/// `quizdoc_pdf::BackendChain`: the chain asks [`is_available`](Self::is_available)
/// in priority order and runs [`extract_text`](Self::extract_text) on the
/// first backend that answers yes.
pub trait PdfBackend: Send + Sync {
    /// Short stable name used in configuration and log output.
    fn name(&self) -> &'static str;

    /// Whether this backend can run in the current build.
    fn is_available(&self) -> bool {
        true
    }

    /// Extract the text of every page, concatenated in page order.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}
