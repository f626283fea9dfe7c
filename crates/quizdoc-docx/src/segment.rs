//! Question/answer segmentation.
//!
//! A paragraph ending in `?` opens a question; the following `A)`–`D)`
//! paragraphs are its answers. A question is kept only if it collected
//! exactly four answers by the time the next question opens (or the input
//! ends).

use once_cell::sync::Lazy;
use regex::Regex;

use quizdoc_core::{ANSWERS_PER_QUESTION, AnswerOption, Paragraph, QuestionRecord, SegmentStats};

static ANSWER_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-D]\)\s*").unwrap());

/// What a paragraph's trimmed text looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    Question,
    Answer,
    Other,
}

/// Classify trimmed paragraph text. A `?` ending wins over an answer label.
pub fn classify(full_text: &str) -> ParagraphKind {
    if full_text.ends_with('?') {
        ParagraphKind::Question
    } else if ANSWER_LABEL_RE.is_match(full_text) {
        ParagraphKind::Answer
    } else {
        ParagraphKind::Other
    }
}

/// Remove the leading `A)`–`D)` label and the whitespace after it.
pub fn strip_answer_label(full_text: &str) -> &str {
    match ANSWER_LABEL_RE.find(full_text) {
        Some(m) => &full_text[m.end()..],
        None => full_text,
    }
}

/// Questions found in a paragraph sequence plus the counters behind them.
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub questions: Vec<QuestionRecord>,
    pub stats: SegmentStats,
}

/// Running state of one segmentation pass.
///
/// Feed paragraphs in document order with [`push`](Self::push), then call
/// [`finish`](Self::finish) to flush the trailing question.
#[derive(Debug, Default)]
pub struct Segmenter {
    current_question: Option<String>,
    current_answers: Vec<AnswerOption>,
    out: Segmentation,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, paragraph: &Paragraph) {
        let full_text = paragraph.full_text();
        if full_text.is_empty() {
            return;
        }
        self.out.stats.paragraphs += 1;

        match classify(&full_text) {
            ParagraphKind::Question => {
                self.flush();
                self.out.stats.questions_opened += 1;
                self.current_question = Some(full_text);
            }
            ParagraphKind::Answer if self.current_answers.len() < ANSWERS_PER_QUESTION => {
                self.current_answers.push(AnswerOption {
                    text: strip_answer_label(&full_text).to_string(),
                    is_correct: paragraph.has_marked_fragment(),
                });
            }
            ParagraphKind::Answer => {
                tracing::debug!(text = %full_text, "ignoring answer past the fourth");
                self.out.stats.extra_answers += 1;
            }
            ParagraphKind::Other => {}
        }
    }

    pub fn finish(mut self) -> Segmentation {
        self.flush();
        self.out
    }

    /// Emit the pending question if it has exactly four answers, then reset.
    fn flush(&mut self) {
        let answers = std::mem::take(&mut self.current_answers);
        let Some(question) = self.current_question.take() else {
            if !answers.is_empty() {
                tracing::debug!(count = answers.len(), "discarding answers with no question");
            }
            return;
        };

        let answers: [AnswerOption; ANSWERS_PER_QUESTION] = match answers.try_into() {
            Ok(answers) => answers,
            Err(short) => {
                tracing::debug!(
                    question = %question,
                    answers = short.len(),
                    "dropping question without exactly four answers"
                );
                self.out.stats.dropped_incomplete += 1;
                return;
            }
        };

        let record = QuestionRecord { question, answers };
        match record.marked_count() {
            0 => {
                tracing::warn!(question = %record.question, "no answer marked correct, using the first");
                self.out.stats.unmarked += 1;
            }
            1 => {}
            n => {
                tracing::warn!(
                    question = %record.question,
                    marked = n,
                    "several answers marked correct, using the first marked"
                );
                self.out.stats.multiple_marked += 1;
            }
        }
        self.out.stats.questions_emitted += 1;
        self.out.questions.push(record);
    }
}

/// Segment paragraphs into questions with exactly four answers each.
pub fn segment(paragraphs: &[Paragraph]) -> Segmentation {
    let mut segmenter = Segmenter::new();
    for paragraph in paragraphs {
        segmenter.push(paragraph);
    }
    segmenter.finish()
}
