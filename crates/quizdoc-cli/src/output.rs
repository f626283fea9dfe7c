use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use quizdoc_core::SegmentStats;
use quizdoc_pdf::BackendChain;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the result of a docx conversion.
pub fn print_conversion_summary(
    w: &mut dyn Write,
    stats: &SegmentStats,
    output: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(
        w,
        "Converted {} questions to JSON format",
        stats.questions_emitted
    )?;
    writeln!(w, "Output saved to: {}", output.display())?;

    let mut notes = Vec::new();
    if stats.dropped_incomplete > 0 {
        notes.push(format!(
            "{} without exactly four answers dropped",
            stats.dropped_incomplete
        ));
    }
    if stats.extra_answers > 0 {
        notes.push(format!("{} extra answers ignored", stats.extra_answers));
    }
    if stats.unmarked > 0 {
        notes.push(format!("{} with no marked answer", stats.unmarked));
    }
    if stats.multiple_marked > 0 {
        notes.push(format!(
            "{} with several marked answers",
            stats.multiple_marked
        ));
    }
    if !notes.is_empty() {
        let line = format!("({})", notes.join(", "));
        if color.enabled() {
            writeln!(w, "{}", line.dimmed())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }
    Ok(())
}

/// List the PDF backends in priority order with their availability.
pub fn print_backends(w: &mut dyn Write, chain: &BackendChain, color: ColorMode) -> std::io::Result<()> {
    // Position, not name: a chain may list the same backend twice.
    let selected = chain.backends().position(|b| b.is_available());
    for (i, backend) in chain.backends().enumerate() {
        let name = backend.name();
        let status = if backend.is_available() {
            "available"
        } else {
            "not compiled in"
        };
        let marker = if selected == Some(i) { "*" } else { " " };

        if !color.enabled() {
            writeln!(w, "{} {:<12} {}", marker, name, status)?;
        } else if backend.is_available() {
            writeln!(w, "{} {:<12} {}", marker, name.bold(), status.green())?;
        } else {
            writeln!(w, "{} {:<12} {}", marker, name.dimmed(), status.red())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use quizdoc_pdf::{BackendError, PdfBackend, UnavailableBackend};

    use super::*;

    struct Ready(&'static str);

    impl PdfBackend for Ready {
        fn name(&self) -> &'static str {
            self.0
        }

        fn extract_text(&self, _path: &Path) -> Result<String, BackendError> {
            Ok(String::new())
        }
    }

    #[test]
    fn summary_reports_count_and_path() {
        let stats = SegmentStats {
            questions_emitted: 12,
            ..Default::default()
        };
        let mut buf = Vec::new();
        print_conversion_summary(
            &mut buf,
            &stats,
            &PathBuf::from("internet-legends-trivia.json"),
            ColorMode(false),
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Converted 12 questions to JSON format\nOutput saved to: internet-legends-trivia.json\n"
        );
    }

    #[test]
    fn summary_mentions_dropped_questions() {
        let stats = SegmentStats {
            questions_emitted: 3,
            dropped_incomplete: 2,
            unmarked: 1,
            ..Default::default()
        };
        let mut buf = Vec::new();
        print_conversion_summary(&mut buf, &stats, Path::new("q.json"), ColorMode(false)).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with(
            "(2 without exactly four answers dropped, 1 with no marked answer)\n"
        ));
    }

    #[test]
    fn backend_listing_marks_the_selected_one() {
        let chain = BackendChain::new(vec![
            Box::new(UnavailableBackend::new("mupdf")) as Box<dyn PdfBackend>,
            Box::new(UnavailableBackend::new("lopdf")),
        ]);
        let mut buf = Vec::new();
        print_backends(&mut buf, &chain, ColorMode(false)).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("  mupdf        not compiled in"));
        assert!(!text.contains('*'));
    }

    #[test]
    fn repeated_backend_is_selected_once() {
        let chain = BackendChain::new(vec![
            Box::new(UnavailableBackend::new("mupdf")) as Box<dyn PdfBackend>,
            Box::new(Ready("lopdf")),
            Box::new(Ready("lopdf")),
        ]);
        let mut buf = Vec::new();
        print_backends(&mut buf, &chain, ColorMode(false)).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("* lopdf"));
        assert!(lines[2].starts_with("  lopdf"));
        assert_eq!(text.matches('*').count(), 1);
    }
}
