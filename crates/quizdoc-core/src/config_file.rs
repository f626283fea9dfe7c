use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FormattingPolicy;

/// Name of the per-directory config file that overrides the platform one.
pub const LOCAL_CONFIG_NAME: &str = ".quizdoc.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub quiz: Option<QuizConfig>,
    pub docx: Option<DocxConfig>,
    pub pdf: Option<PdfConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizConfig {
    pub title: Option<String>,
    pub marker_color: Option<String>,
    pub formatting: Option<FormattingPolicy>,
    pub indent: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocxConfig {
    pub part: Option<String>,
    pub max_part_size_mb: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfConfig {
    pub backends: Option<Vec<String>>,
}

/// Platform config directory path: `<config_dir>/quizdoc/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("quizdoc").join("config.toml"))
}

/// Load config by cascading CWD `.quizdoc.toml` over platform config.
/// CWD values override platform values. Missing files are skipped; a file
/// that exists but does not parse is an error.
pub fn load_config() -> Result<ConfigFile, ConfigError> {
    let platform = match config_path() {
        Some(p) => load_from_path(&p)?,
        None => None,
    };
    let cwd = load_from_path(Path::new(LOCAL_CONFIG_NAME))?;

    Ok(match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    })
}

/// Load a config from a specific path. Returns `Ok(None)` if the file doesn't exist.
pub fn load_from_path(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// First `Some` of `overlay` then `base` for one field of an optional section.
fn pick<S, T>(overlay: Option<&S>, base: Option<&S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay.and_then(&field).or_else(|| base.and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bq, oq) = (base.quiz.as_ref(), overlay.quiz.as_ref());
    let (bd, od) = (base.docx.as_ref(), overlay.docx.as_ref());
    let (bp, op) = (base.pdf.as_ref(), overlay.pdf.as_ref());

    ConfigFile {
        quiz: Some(QuizConfig {
            title: pick(oq, bq, |q| q.title.clone()),
            marker_color: pick(oq, bq, |q| q.marker_color.clone()),
            formatting: pick(oq, bq, |q| q.formatting),
            indent: pick(oq, bq, |q| q.indent),
        }),
        docx: Some(DocxConfig {
            part: pick(od, bd, |d| d.part.clone()),
            max_part_size_mb: pick(od, bd, |d| d.max_part_size_mb),
        }),
        pdf: Some(PdfConfig {
            backends: pick(op, bp, |p| p.backends.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config() {
        let toml_str = "[quiz]\ntitle = \"Pub Night\"\nformatting = \"carry-forward\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let quiz = parsed.quiz.unwrap();
        assert_eq!(quiz.title.as_deref(), Some("Pub Night"));
        assert_eq!(quiz.formatting, Some(FormattingPolicy::CarryForward));
        assert!(quiz.marker_color.is_none());
        assert!(parsed.pdf.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            quiz: Some(QuizConfig {
                title: Some("Base".to_string()),
                indent: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            quiz: Some(QuizConfig {
                title: Some("Overlay".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay).quiz.unwrap();
        assert_eq!(merged.title.as_deref(), Some("Overlay"));
        assert_eq!(merged.indent, Some(2));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            pdf: Some(PdfConfig {
                backends: Some(vec!["lopdf".to_string()]),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(
            merged.pdf.unwrap().backends.unwrap(),
            vec!["lopdf".to_string()]
        );
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_from_path(&dir.path().join("nope.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[quiz\ntitle = ").unwrap();
        assert!(matches!(
            load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
