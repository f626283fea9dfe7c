use std::path::Path;

use quizdoc_core::{BackendError, PdfBackend};

/// Backend built on the `pdf-extract` crate, which handles more font
/// encodings than plain `lopdf` at the cost of speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractBackend;

impl PdfBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        if !path.is_file() {
            return Err(BackendError::OpenError(format!(
                "{} is not a file",
                path.display()
            )));
        }
        pdf_extract::extract_text(path).map_err(|e| BackendError::ExtractionError(e.to_string()))
    }
}
