use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use quizdoc_core::FormattingPolicy;
use quizdoc_core::config_file::{self, ConfigFile};
use tracing_subscriber::EnvFilter;

mod output;
mod settings;

use output::ColorMode;
use settings::ConvertFlags;

/// quizdoc - Turn trivia .docx files into quiz JSON and pull text out of PDFs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the platform and ./.quizdoc.toml cascade
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a trivia .docx document into a quiz JSON file
    Convert {
        /// Path to the .docx file
        file_path: PathBuf,

        /// Output JSON path; `-` writes to stdout (default: <title-slug>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        quiz: QuizArgs,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the text of every page of a PDF
    ExtractPdf {
        /// Path to the PDF file
        file_path: PathBuf,

        /// Write the text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Backend to try, in order (repeatable): mupdf, lopdf, pdf-extract
        #[arg(long = "backend", value_delimiter = ',')]
        backends: Vec<String>,
    },

    /// List PDF backends in priority order and whether they are compiled in
    Backends {
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Args, Debug)]
struct QuizArgs {
    /// Quiz title written into the file
    #[arg(long)]
    title: Option<String>,

    /// Hex color marking the correct answer (default: 980000)
    #[arg(long)]
    marker_color: Option<String>,

    /// How runs without formatting properties are read: per-run or carry-forward
    #[arg(long)]
    formatting: Option<FormattingPolicy>,

    /// Spaces per JSON indentation level; 0 writes compact JSON
    #[arg(long)]
    indent: Option<usize>,
}

impl From<QuizArgs> for ConvertFlags {
    fn from(args: QuizArgs) -> Self {
        Self {
            title: args.title,
            marker_color: args.marker_color,
            formatting: args.formatting,
            indent: args.indent,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Convert {
            file_path,
            output,
            quiz,
            no_color,
        } => convert(&file_path, output, quiz.into(), no_color, &config),
        Command::ExtractPdf {
            file_path,
            output,
            backends,
        } => extract_pdf(&file_path, output, &backends, &config),
        Command::Backends { no_color } => {
            let chain = settings::resolve_backends(&[], &config, env_var)?;
            let color = ColorMode(!no_color && std::io::stdout().is_terminal());
            output::print_backends(&mut std::io::stdout(), &chain, color)?;
            Ok(())
        }
    }
}

/// Log to stderr so stdout stays clean for extracted text and JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<ConfigFile> {
    match explicit {
        Some(path) => config_file::load_from_path(path)?
            .ok_or_else(|| anyhow::anyhow!("Config file not found: {}", path.display())),
        None => Ok(config_file::load_config()?),
    }
}

fn convert(
    file_path: &Path,
    out_path: Option<PathBuf>,
    flags: ConvertFlags,
    no_color: bool,
    config: &ConfigFile,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let resolved = settings::resolve_convert(&flags, config, env_var)?;
    let conversion = quizdoc_docx::convert_docx(file_path, &resolved.options)
        .with_context(|| format!("Failed to convert {}", file_path.display()))?;

    let out_path =
        out_path.unwrap_or_else(|| settings::default_output_path(&resolved.options.title));
    let to_stdout = out_path.as_os_str() == "-";

    // The summary goes to stderr when stdout carries the JSON itself.
    let mut report: Box<dyn Write> = if to_stdout {
        let json = quizdoc_docx::render_quiz(&conversion.quiz, resolved.indent)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&json)?;
        writeln!(stdout)?;
        Box::new(std::io::stderr())
    } else {
        quizdoc_docx::write_quiz(&conversion.quiz, &out_path, resolved.indent)?;
        Box::new(std::io::stdout())
    };

    let color = ColorMode(!no_color && !to_stdout && std::io::stdout().is_terminal());
    let shown: &Path = if to_stdout { Path::new("<stdout>") } else { &out_path };
    output::print_conversion_summary(&mut report, &conversion.stats, shown, color)?;
    Ok(())
}

fn extract_pdf(
    file_path: &Path,
    out_path: Option<PathBuf>,
    backends: &[String],
    config: &ConfigFile,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let chain = settings::resolve_backends(backends, config, env_var)?;
    let extracted = chain.extract_text(file_path)?;
    tracing::info!(
        backend = extracted.backend,
        chars = extracted.text.len(),
        "extracted PDF text"
    );

    match out_path {
        Some(path) => quizdoc_core::write_atomic(&path, extracted.text.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", extracted.text)?;
        }
    }
    Ok(())
}
