use std::path::Path;

use quizdoc_core::{BackendError, PdfBackend};

use crate::PdfError;

/// The text extraction backends this crate knows about, in default priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Mupdf,
    Lopdf,
    PdfExtract,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [Self::Mupdf, Self::Lopdf, Self::PdfExtract];

    pub fn name(self) -> &'static str {
        match self {
            Self::Mupdf => "mupdf",
            Self::Lopdf => "lopdf",
            Self::PdfExtract => "pdf-extract",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Build the probe for this backend. Backends whose cargo feature is off
    /// come back as an [`UnavailableBackend`].
    pub fn probe(self) -> Box<dyn PdfBackend> {
        match self {
            #[cfg(feature = "mupdf")]
            Self::Mupdf => Box::new(quizdoc_pdf_mupdf::MupdfBackend::new()),
            #[cfg(feature = "lopdf")]
            Self::Lopdf => Box::new(crate::lopdf_backend::LopdfBackend),
            #[cfg(feature = "pdf-extract")]
            Self::PdfExtract => Box::new(crate::pdf_extract_backend::PdfExtractBackend),
            #[allow(unreachable_patterns)]
            other => Box::new(UnavailableBackend::new(other.name())),
        }
    }
}

/// Placeholder for a backend that is not compiled into this build.
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    name: &'static str,
}

impl UnavailableBackend {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl PdfBackend for UnavailableBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_available(&self) -> bool {
        false
    }

    fn extract_text(&self, _path: &Path) -> Result<String, BackendError> {
        Err(BackendError::Unavailable(self.name))
    }
}

/// Text pulled out of a PDF and the backend that produced it.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub backend: &'static str,
    pub text: String,
}

/// Ordered list of backend probes; the first available one does the work.
pub struct BackendChain {
    backends: Vec<Box<dyn PdfBackend>>,
}

impl Default for BackendChain {
    fn default() -> Self {
        Self::with_kinds(&BackendKind::ALL)
    }
}

impl BackendChain {
    pub fn new(backends: Vec<Box<dyn PdfBackend>>) -> Self {
        Self { backends }
    }

    pub fn with_kinds(kinds: &[BackendKind]) -> Self {
        Self::new(kinds.iter().map(|k| k.probe()).collect())
    }

    /// Build a chain from backend names, keeping their order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, PdfError> {
        let kinds = names
            .iter()
            .map(|n| {
                BackendKind::from_name(n.as_ref())
                    .ok_or_else(|| PdfError::UnknownBackend(n.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_kinds(&kinds))
    }

    pub fn backends(&self) -> impl Iterator<Item = &dyn PdfBackend> {
        self.backends.iter().map(|b| b.as_ref())
    }

    /// First backend that reports itself available.
    pub fn select(&self) -> Result<&dyn PdfBackend, PdfError> {
        self.backends()
            .find(|b| b.is_available())
            .ok_or_else(|| PdfError::NoBackendAvailable {
                tried: self
                    .backends()
                    .map(|b| b.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Extract text with the first available backend.
    ///
    /// A failure of that backend is returned as is; later backends are not
    /// tried, so the error always names the backend that actually ran.
    pub fn extract_text(&self, path: &Path) -> Result<ExtractedText, PdfError> {
        let backend = self.select()?;
        tracing::debug!(backend = backend.name(), path = %path.display(), "extracting PDF text");

        let text = backend
            .extract_text(path)
            .map_err(|source| PdfError::Backend {
                backend: backend.name(),
                source,
            })?;

        Ok(ExtractedText {
            backend: backend.name(),
            text,
        })
    }
}
