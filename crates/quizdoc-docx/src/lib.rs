use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod loader;
pub mod paragraphs;
pub mod segment;
pub mod serialize;

pub use loader::{DEFAULT_MAX_PART_SIZE, DOCUMENT_PART, load_document_xml, load_part};
pub use paragraphs::{ExtractOptions, extract_paragraphs};
pub use segment::{Segmentation, Segmenter, segment};
pub use serialize::{DEFAULT_INDENT, build_quiz, render_quiz, write_quiz};
// Re-export domain types from core (canonical definitions live there)
pub use quizdoc_core::{
    AnswerOption, FormattingPolicy, Paragraph, QuestionRecord, Quiz, QuizQuestion, SegmentStats,
    TextFragment,
};

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not a readable zip container: {source}", path.display())]
    Container {
        path: PathBuf,
        source: zip::result::ZipError,
    },
    #[error("{} has no `{part}` part", path.display())]
    MissingPart { path: PathBuf, part: String },
    #[error("part `{part}` exceeds the {limit} byte limit")]
    PartTooLarge { part: String, limit: u64 },
    #[error("failed to read part `{part}`: {source}")]
    Read {
        part: String,
        source: std::io::Error,
    },
    #[error("part `{part}` is not valid UTF-8")]
    NotUtf8 { part: String },
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("document has no <{0}> element")]
    MissingElement(&'static str),
    #[error("document XML ended inside an open element")]
    UnexpectedEof,
    #[error("failed to serialize quiz: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything the docx → quiz conversion can be tuned with.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub title: String,
    pub extract: ExtractOptions,
    /// Zip part holding the document body.
    pub part: String,
    /// Decompressed size cap for `part` in bytes (0 = unlimited).
    pub max_part_size: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            title: quizdoc_core::DEFAULT_QUIZ_TITLE.to_string(),
            extract: ExtractOptions::default(),
            part: DOCUMENT_PART.to_string(),
            max_part_size: DEFAULT_MAX_PART_SIZE,
        }
    }
}

/// Result of converting one document.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub quiz: Quiz,
    pub stats: SegmentStats,
}

/// Convert already-loaded document XML into a quiz.
///
/// Pipeline:
/// 1. Extract non-empty paragraphs with their run formatting
/// 2. Segment paragraphs into questions with exactly four answers
/// 3. Map the questions onto the quiz file shape
pub fn convert_xml(xml: &str, options: &ConvertOptions) -> Result<Conversion, DocxError> {
    let paragraphs = extract_paragraphs(xml, &options.extract)?;
    tracing::debug!(paragraphs = paragraphs.len(), "extracted paragraphs");

    let Segmentation { questions, stats } = segment(&paragraphs);
    tracing::info!(
        opened = stats.questions_opened,
        emitted = stats.questions_emitted,
        dropped = stats.dropped_incomplete,
        "segmented questions"
    );

    Ok(Conversion {
        quiz: build_quiz(options.title.clone(), &questions),
        stats,
    })
}

/// Convert the `.docx` at `path` into a quiz. Nothing is written to disk.
pub fn convert_docx(path: &Path, options: &ConvertOptions) -> Result<Conversion, DocxError> {
    let xml = load_part(path, &options.part, options.max_part_size)?;
    convert_xml(&xml, options)
}
