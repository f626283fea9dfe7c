//! Resolution of effective settings: CLI flags > env vars > config file > defaults.

use std::path::PathBuf;

use quizdoc_core::FormattingPolicy;
use quizdoc_core::config_file::ConfigFile;
use quizdoc_docx::{ConvertOptions, DEFAULT_INDENT, ExtractOptions};
use quizdoc_pdf::{BackendChain, BackendKind};

pub const ENV_TITLE: &str = "QUIZDOC_TITLE";
pub const ENV_MARKER_COLOR: &str = "QUIZDOC_MARKER_COLOR";
pub const ENV_FORMATTING: &str = "QUIZDOC_FORMATTING";
pub const ENV_PDF_BACKENDS: &str = "QUIZDOC_PDF_BACKENDS";

/// Flags of the `convert` subcommand that feed into [`ConvertOptions`].
#[derive(Debug, Clone, Default)]
pub struct ConvertFlags {
    pub title: Option<String>,
    pub marker_color: Option<String>,
    pub formatting: Option<FormattingPolicy>,
    pub indent: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub options: ConvertOptions,
    pub indent: usize,
}

/// Normalize a hex color to six uppercase digits, accepting a leading `#`.
pub fn parse_marker_color(raw: &str) -> anyhow::Result<String> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        anyhow::bail!("marker color must be six hex digits, got `{raw}`");
    }
    Ok(hex.to_ascii_uppercase())
}

pub fn resolve_convert(
    flags: &ConvertFlags,
    config: &ConfigFile,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ConvertSettings> {
    let quiz = config.quiz.clone().unwrap_or_default();
    let docx = config.docx.clone().unwrap_or_default();
    let defaults = ConvertOptions::default();

    let title = flags
        .title
        .clone()
        .or_else(|| env(ENV_TITLE))
        .or(quiz.title)
        .unwrap_or(defaults.title);

    let marker_color = match flags
        .marker_color
        .clone()
        .or_else(|| env(ENV_MARKER_COLOR))
        .or(quiz.marker_color)
    {
        Some(raw) => parse_marker_color(&raw)?,
        None => defaults.extract.marker_color,
    };

    let formatting = match flags.formatting {
        Some(policy) => policy,
        None => match env(ENV_FORMATTING) {
            Some(raw) => raw.parse().map_err(anyhow::Error::msg)?,
            None => quiz.formatting.unwrap_or_default(),
        },
    };

    let max_part_size = docx
        .max_part_size_mb
        .map(|mb| mb.saturating_mul(1024 * 1024))
        .unwrap_or(defaults.max_part_size);

    Ok(ConvertSettings {
        options: ConvertOptions {
            title,
            extract: ExtractOptions {
                marker_color,
                formatting,
            },
            part: docx.part.unwrap_or(defaults.part),
            max_part_size,
        },
        indent: flags.indent.or(quiz.indent).unwrap_or(DEFAULT_INDENT),
    })
}

/// Backend order from `--backend` flags, `QUIZDOC_PDF_BACKENDS`, the config
/// file, or the built-in priority list, whichever comes first.
pub fn resolve_backends(
    flags: &[String],
    config: &ConfigFile,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<BackendChain> {
    let names: Option<Vec<String>> = if !flags.is_empty() {
        Some(flags.to_vec())
    } else if let Some(raw) = env(ENV_PDF_BACKENDS) {
        Some(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    } else {
        config.pdf.as_ref().and_then(|p| p.backends.clone())
    };

    Ok(match names {
        Some(names) => BackendChain::from_names(&names)?,
        None => BackendChain::with_kinds(&BackendKind::ALL),
    })
}

/// `<slug-of-title>.json`, e.g. `internet-legends-trivia.json`.
pub fn default_output_path(title: &str) -> PathBuf {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        PathBuf::from("quiz.json")
    } else {
        PathBuf::from(format!("{slug}.json"))
    }
}
