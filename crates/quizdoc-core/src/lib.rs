use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;
pub mod write;

pub use backend::{BackendError, PdfBackend};
pub use write::write_atomic;

/// Title written into the quiz file when nothing else is configured.
pub const DEFAULT_QUIZ_TITLE: &str = "Internet Legends Trivia";

/// Color (`w:color w:val`) the question authors use to flag the correct answer.
pub const DEFAULT_MARKER_COLOR: &str = "980000";

/// Number of answer options every emitted question carries.
pub const ANSWERS_PER_QUESTION: usize = 4;

/// How a run without its own `w:rPr` gets its formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormattingPolicy {
    /// Each run is formatted from its own properties only; no properties means plain.
    #[default]
    PerRun,
    /// A run without properties reuses the last formatting seen in the same paragraph.
    CarryForward,
}

impl std::str::FromStr for FormattingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "per-run" | "per_run" => Ok(Self::PerRun),
            "carry-forward" | "carry_forward" => Ok(Self::CarryForward),
            other => Err(format!(
                "unknown formatting policy `{other}` (expected `per-run` or `carry-forward`)"
            )),
        }
    }
}

/// A contiguous run of literal text and the two formatting bits we care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    pub text: String,
    pub bold: bool,
    pub is_marker_color: bool,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, bold: bool, is_marker_color: bool) -> Self {
        Self {
            text: text.into(),
            bold,
            is_marker_color,
        }
    }

    /// Plain text with no formatting.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, false, false)
    }

    /// Bold text in the marker color, i.e. how a correct answer is written.
    pub fn marked(text: impl Into<String>) -> Self {
        Self::new(text, true, true)
    }

    /// True when the fragment is both bold and in the marker color.
    pub fn flags_correct(&self) -> bool {
        self.bold && self.is_marker_color
    }
}

/// One paragraph of the source document, reduced to its text fragments.
///
/// Never empty: paragraphs without fragments are dropped during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub fragments: Vec<TextFragment>,
}

impl Paragraph {
    pub fn new(fragments: Vec<TextFragment>) -> Self {
        Self { fragments }
    }

    /// Concatenated fragment text, trimmed of surrounding whitespace.
    pub fn full_text(&self) -> String {
        let joined: String = self.fragments.iter().map(|f| f.text.as_str()).collect();
        joined.trim().to_string()
    }

    /// True if any fragment is both bold and marker colored.
    pub fn has_marked_fragment(&self) -> bool {
        self.fragments.iter().any(TextFragment::flags_correct)
    }
}

/// An answer option with its `A)`–`D)` label already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub text: String,
    pub is_correct: bool,
}

/// A finalized question with exactly four answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub question: String,
    pub answers: [AnswerOption; ANSWERS_PER_QUESTION],
}

impl QuestionRecord {
    /// Index of the first answer marked correct, or 0 when none is marked.
    pub fn correct_index(&self) -> usize {
        self.answers
            .iter()
            .position(|a| a.is_correct)
            .unwrap_or(0)
    }

    /// How many answers carry the correct marker.
    pub fn marked_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }
}

/// Counters collected while segmenting paragraphs into questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentStats {
    /// Non-empty paragraphs inspected.
    pub paragraphs: usize,
    /// Paragraphs that opened a question (ended with `?`).
    pub questions_opened: usize,
    /// Questions emitted with exactly four answers.
    pub questions_emitted: usize,
    /// Questions discarded because they did not collect four answers.
    pub dropped_incomplete: usize,
    /// Answer-shaped paragraphs ignored because four answers were already collected.
    pub extra_answers: usize,
    /// Emitted questions where no answer was marked (correct defaulted to 0).
    pub unmarked: usize,
    /// Emitted questions where more than one answer was marked.
    pub multiple_marked: usize,
}

/// The quiz file written by the converter.
///
/// Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    pub correct: usize,
    pub answers: [String; ANSWERS_PER_QUESTION],
}

impl From<&QuestionRecord> for QuizQuestion {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            question: record.question.clone(),
            correct: record.correct_index(),
            answers: record.answers.clone().map(|a| a.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str, is_correct: bool) -> AnswerOption {
        AnswerOption {
            text: text.to_string(),
            is_correct,
        }
    }

    #[test]
    fn formatting_policy_parses_both_spellings() {
        assert_eq!("per-run".parse(), Ok(FormattingPolicy::PerRun));
        assert_eq!("Carry_Forward".parse(), Ok(FormattingPolicy::CarryForward));
        assert!("sticky".parse::<FormattingPolicy>().is_err());
    }

    #[test]
    fn full_text_joins_and_trims() {
        let para = Paragraph::new(vec![
            TextFragment::plain("  Capital of "),
            TextFragment::marked("France?  "),
        ]);
        assert_eq!(para.full_text(), "Capital of France?");
    }

    #[test]
    fn marked_fragment_needs_bold_and_color() {
        let bold_only = Paragraph::new(vec![TextFragment::new("x", true, false)]);
        let color_only = Paragraph::new(vec![TextFragment::new("x", false, true)]);
        let both = Paragraph::new(vec![TextFragment::plain("A) "), TextFragment::marked("x")]);
        assert!(!bold_only.has_marked_fragment());
        assert!(!color_only.has_marked_fragment());
        assert!(both.has_marked_fragment());
    }

    #[test]
    fn correct_index_defaults_and_tie_breaks() {
        let none = QuestionRecord {
            question: "Q?".into(),
            answers: [
                answer("a", false),
                answer("b", false),
                answer("c", false),
                answer("d", false),
            ],
        };
        assert_eq!(none.correct_index(), 0);
        assert_eq!(none.marked_count(), 0);

        let two = QuestionRecord {
            question: "Q?".into(),
            answers: [
                answer("a", false),
                answer("b", true),
                answer("c", false),
                answer("d", true),
            ],
        };
        assert_eq!(two.correct_index(), 1);
        assert_eq!(two.marked_count(), 2);
    }

    #[test]
    fn quiz_question_serializes_in_key_order() {
        let record = QuestionRecord {
            question: "Capital of France?".into(),
            answers: [
                answer("Berlin", false),
                answer("Madrid", false),
                answer("Paris", true),
                answer("Rome", false),
            ],
        };
        let json = serde_json::to_string(&QuizQuestion::from(&record)).unwrap();
        assert_eq!(
            json,
            r#"{"question":"Capital of France?","correct":2,"answers":["Berlin","Madrid","Paris","Rome"]}"#
        );
    }
}
