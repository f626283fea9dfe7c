//! Paragraph extraction from WordprocessingML (`word/document.xml`).
//!
//! Walks the markup with a namespace-aware SAX reader and reduces each `w:p`
//! to the text of its runs, keeping only the formatting bits the quiz
//! segmenter looks at: bold and the marker color.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use quizdoc_core::{DEFAULT_MARKER_COLOR, FormattingPolicy, Paragraph, TextFragment};

use crate::DocxError;

/// WordprocessingML main namespace; element prefixes are resolved against it.
pub const WORDML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Options controlling how run formatting is read.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Six hex digits compared case-insensitively against `w:color w:val`.
    pub marker_color: String,
    pub formatting: FormattingPolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            marker_color: DEFAULT_MARKER_COLOR.to_string(),
            formatting: FormattingPolicy::default(),
        }
    }
}

/// Elements the walker tracks on its open-element stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Document,
    Body,
    Paragraph,
    Run,
    RunProps,
    Text,
    Other,
}

#[derive(Debug, Clone, Copy, Default)]
struct Formatting {
    bold: bool,
    marker: bool,
}

#[derive(Debug, Default)]
struct RunState {
    /// `Some` once the run's own `w:rPr` was seen.
    formatting: Option<Formatting>,
    /// Text of the first `w:t` child; later `w:t` siblings are ignored.
    text: Option<String>,
    capturing: bool,
}

#[derive(Debug, Default)]
struct ParagraphState {
    /// Output slot reserved when the paragraph opened.
    slot: usize,
    fragments: Vec<TextFragment>,
    /// Last explicit run formatting, used by [`FormattingPolicy::CarryForward`].
    carried: Formatting,
    run: Option<RunState>,
}

struct Walker<'a> {
    options: &'a ExtractOptions,
    stack: Vec<Tag>,
    /// Open paragraphs, innermost last. Text boxes nest a `w:p` inside a run.
    open: Vec<ParagraphState>,
    /// One slot per paragraph in start-tag order; `None` once closed empty.
    out: Vec<Option<Paragraph>>,
    saw_root: bool,
    saw_body: bool,
}

impl<'a> Walker<'a> {
    fn new(options: &'a ExtractOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            open: Vec::new(),
            out: Vec::new(),
            saw_root: false,
            saw_body: false,
        }
    }

    fn classify(&self, in_wordml: bool, local: &[u8]) -> Tag {
        if !in_wordml {
            return Tag::Other;
        }
        let parent = self.stack.last().copied();
        match local {
            b"document" if parent.is_none() => Tag::Document,
            b"body" if parent == Some(Tag::Document) => Tag::Body,
            b"p" => Tag::Paragraph,
            b"r" if !self.open.is_empty() => Tag::Run,
            b"rPr" if parent == Some(Tag::Run) => Tag::RunProps,
            b"t" if parent == Some(Tag::Run) => Tag::Text,
            _ => Tag::Other,
        }
    }

    fn current_run(&mut self) -> Option<&mut RunState> {
        self.open.last_mut().and_then(|p| p.run.as_mut())
    }

    fn open(&mut self, tag: Tag, local: &[u8], e: &BytesStart<'_>) -> Result<(), DocxError> {
        if !self.saw_root {
            if tag != Tag::Document {
                return Err(DocxError::MissingElement("w:document"));
            }
            self.saw_root = true;
        }

        match tag {
            Tag::Body => self.saw_body = true,
            Tag::Paragraph => {
                self.open.push(ParagraphState {
                    slot: self.out.len(),
                    ..Default::default()
                });
                self.out.push(None);
            }
            Tag::Run => {
                if let Some(para) = self.open.last_mut() {
                    para.run = Some(RunState::default());
                }
            }
            Tag::RunProps => {
                if let Some(run) = self.current_run() {
                    run.formatting = Some(Formatting::default());
                }
            }
            Tag::Text => {
                if let Some(run) = self.current_run() {
                    if run.text.is_none() {
                        run.text = Some(String::new());
                        run.capturing = true;
                    }
                }
            }
            Tag::Other if self.stack.last() == Some(&Tag::RunProps) => {
                self.run_property(local, e);
            }
            Tag::Document | Tag::Other => {}
        }
        Ok(())
    }

    /// Apply a child of the run's `w:rPr` (`w:b`, `w:color`).
    fn run_property(&mut self, local: &[u8], e: &BytesStart<'_>) {
        let val = e
            .attributes()
            .flatten()
            .find(|a| a.key.local_name().as_ref() == b"val")
            .map(|a| String::from_utf8_lossy(&a.value).into_owned());
        let options = self.options;

        let Some(fmt) = self.current_run().and_then(|r| r.formatting.as_mut()) else {
            return;
        };
        match local {
            b"b" => {
                fmt.bold = !matches!(val.as_deref(), Some("0" | "false" | "off"));
            }
            b"color" => {
                fmt.marker = val.is_some_and(|v| v.eq_ignore_ascii_case(&options.marker_color));
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: Tag) {
        match tag {
            Tag::Text => {
                if let Some(run) = self.current_run() {
                    run.capturing = false;
                }
            }
            Tag::Run => self.finish_run(),
            Tag::Paragraph => {
                if let Some(para) = self.open.pop() {
                    if !para.fragments.is_empty() {
                        self.out[para.slot] = Some(Paragraph::new(para.fragments));
                    }
                }
            }
            _ => {}
        }
    }

    fn finish_run(&mut self) {
        let policy = self.options.formatting;
        let Some(para) = self.open.last_mut() else {
            return;
        };
        let Some(run) = para.run.take() else {
            return;
        };

        let fmt = match (run.formatting, policy) {
            (Some(fmt), _) => {
                para.carried = fmt;
                fmt
            }
            (None, FormattingPolicy::PerRun) => Formatting::default(),
            (None, FormattingPolicy::CarryForward) => para.carried,
        };

        if let Some(text) = run.text.filter(|t| !t.is_empty()) {
            para.fragments.push(TextFragment::new(text, fmt.bold, fmt.marker));
        }
    }

    fn text(&mut self, text: &str) {
        if self.stack.last() != Some(&Tag::Text) {
            return;
        }
        if let Some(run) = self.current_run() {
            if run.capturing {
                if let Some(buf) = run.text.as_mut() {
                    buf.push_str(text);
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<Paragraph>, DocxError> {
        if !self.saw_root {
            return Err(DocxError::MissingElement("w:document"));
        }
        if !self.stack.is_empty() {
            return Err(DocxError::UnexpectedEof);
        }
        if !self.saw_body {
            return Err(DocxError::MissingElement("w:body"));
        }
        Ok(self.out.into_iter().flatten().collect())
    }
}

/// Extract the non-empty paragraphs of a `word/document.xml` in document order.
///
/// A paragraph nested in a text box is its own paragraph and follows the
/// paragraph hosting the text box, as its start tag does.
pub fn extract_paragraphs(xml: &str, options: &ExtractOptions) -> Result<Vec<Paragraph>, DocxError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut walker = Walker::new(options);

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let in_wordml = matches!(ns, ResolveResult::Bound(Namespace(n)) if n == WORDML_NS);

        match event {
            Event::Start(ref e) => {
                let local = e.local_name();
                let tag = walker.classify(in_wordml, local.as_ref());
                walker.open(tag, local.as_ref(), e)?;
                walker.stack.push(tag);
            }
            Event::Empty(ref e) => {
                let local = e.local_name();
                let tag = walker.classify(in_wordml, local.as_ref());
                walker.open(tag, local.as_ref(), e)?;
                walker.close(tag);
            }
            Event::End(_) => {
                if let Some(tag) = walker.stack.pop() {
                    walker.close(tag);
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(quick_xml::Error::from)?;
                walker.text(&text);
            }
            Event::CData(ref e) => {
                walker.text(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    walker.finish()
}
