use std::path::Path;

use thiserror::Error;

pub mod chain;
#[cfg(feature = "lopdf")]
pub mod lopdf_backend;
#[cfg(feature = "pdf-extract")]
pub mod pdf_extract_backend;

pub use chain::{BackendChain, BackendKind, ExtractedText, UnavailableBackend};
// Re-export the backend trait from core (canonical definition lives there)
pub use quizdoc_core::{BackendError, PdfBackend};

#[derive(Error, Debug)]
pub enum PdfError {
    #[error(
        "no PDF text extraction backend available (tried: {tried}); \
         install one by rebuilding quizdoc with `--features mupdf`, `lopdf` or `pdf-extract`"
    )]
    NoBackendAvailable { tried: String },
    #[error("unknown PDF backend `{0}` (known backends: mupdf, lopdf, pdf-extract)")]
    UnknownBackend(String),
    #[error("{backend} could not extract text: {source}")]
    Backend {
        backend: &'static str,
        source: BackendError,
    },
}

/// Extract the text of every page of `path` with the default backend chain.
pub fn extract_text(path: &Path) -> Result<ExtractedText, PdfError> {
    BackendChain::default().extract_text(path)
}
