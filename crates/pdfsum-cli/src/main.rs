use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pdfsum_core::{Settings, Summarizer, config_file};
use pdfsum_pdf_mupdf::MupdfBackend;

/// PDF Summarizer - Extract text from a PDF and summarize it with BART
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file layered over the platform and working-directory configs
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and summarize a PDF
    Summarize {
        /// Path to the PDF file
        file_path: PathBuf,

        /// Wrap the summary at this many columns
        #[arg(long)]
        width: Option<usize>,
    },

    /// Print the extracted text of a PDF without loading the model
    Extract {
        /// Path to the PDF file
        file_path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = default_log_level(cli.verbose);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config_file::load_config(cli.config.as_deref())?;
    let settings = Settings::from_env(&config)?;

    match cli.command {
        Command::Extract { file_path } => {
            let bytes = read_pdf(&file_path)?;
            let text = pdfsum_core::extract(&MupdfBackend::new(), &bytes)
                .with_context(|| format!("extracting {}", file_path.display()))?;
            println!("{}", text.as_str());
        }
        Command::Summarize { file_path, width } => {
            let bytes = read_pdf(&file_path)?;
            let summarizer = load_summarizer(&settings)?;
            let width = width.unwrap_or(settings.wrap_width).max(1);
            let (text, summary) = pdfsum_core::summarize_pdf(
                &MupdfBackend::new(),
                summarizer.as_ref(),
                &bytes,
                width,
            )
            .with_context(|| format!("summarizing {}", file_path.display()))?;
            tracing::info!(chars = text.char_count(), lines = summary.lines().len(), "done");
            println!("{}", summary.wrapped());
        }
    }

    Ok(())
}

fn read_pdf(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

#[cfg(feature = "bart")]
fn load_summarizer(settings: &Settings) -> anyhow::Result<Box<dyn Summarizer>> {
    let options = pdfsum_bart::BartOptions::from_settings(settings);
    Ok(Box::new(pdfsum_bart::BartSummarizer::load(options)?))
}

#[cfg(not(feature = "bart"))]
fn load_summarizer(_settings: &Settings) -> anyhow::Result<Box<dyn Summarizer>> {
    Err(pdfsum_core::SummarizerError::NotCompiled.into())
}

/// Log level used when `RUST_LOG` is unset.
fn default_log_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}
