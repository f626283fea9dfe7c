use std::path::Path;

use lopdf::Document;

use quizdoc_core::{BackendError, PdfBackend};

/// Pure-Rust backend built on `lopdf`'s content stream text extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let document = Document::load(path).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut text = String::new();
        // `get_pages` is keyed by 1-based page number, so this is page order.
        for page_number in document.get_pages().into_keys() {
            let page_text = document.extract_text(&[page_number]).map_err(|e| {
                BackendError::ExtractionError(format!("page {page_number}: {e}"))
            })?;
            text.push_str(&page_text);
        }
        Ok(text)
    }
}
