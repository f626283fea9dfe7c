use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use quizdoc_core::{QuestionRecord, Quiz, QuizQuestion, write_atomic};

use crate::DocxError;

/// Spaces per indentation level in the written quiz file.
pub const DEFAULT_INDENT: usize = 4;

/// Map finalized question records onto the quiz file shape, preserving order.
pub fn build_quiz(title: impl Into<String>, records: &[QuestionRecord]) -> Quiz {
    Quiz {
        title: title.into(),
        questions: records.iter().map(QuizQuestion::from).collect(),
    }
}

/// Render a quiz as JSON. `indent` is spaces per level; 0 renders compact JSON.
pub fn render_quiz(quiz: &Quiz, indent: usize) -> Result<Vec<u8>, serde_json::Error> {
    if indent == 0 {
        return serde_json::to_vec(quiz);
    }
    let indent = vec![b' '; indent];
    let mut ser = Serializer::with_formatter(Vec::new(), PrettyFormatter::with_indent(&indent));
    quiz.serialize(&mut ser)?;
    Ok(ser.into_inner())
}

/// Write the quiz to `path`.
///
/// The JSON goes to a temp file next to `path` that is renamed into place,
/// so a failed write leaves no partial file behind.
pub fn write_quiz(quiz: &Quiz, path: &Path, indent: usize) -> Result<(), DocxError> {
    let bytes = render_quiz(quiz, indent)?;
    write_atomic(path, &bytes).map_err(|source| DocxError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), questions = quiz.questions.len(), "wrote quiz");
    Ok(())
}
