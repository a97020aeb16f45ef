use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod mock;
pub mod text;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, Summarizer, SummarizerError, is_pdf};
pub use config_file::{ConfigError, ConfigFile, DeviceChoice, Settings};
pub use text::{expand_ligatures, snippet};

/// Default line width for wrapped summaries.
pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// Number of characters kept in an extracted-text snippet.
pub const SNIPPET_CHARS: usize = 200;

/// Text extracted from a PDF, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of Unicode scalar values in the text.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// The text with every line break replaced by a single space.
    pub fn flattened(&self) -> String {
        self.0.replace('\n', " ")
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A generated summary, already wrapped into display lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    lines: Vec<String>,
}

impl Summary {
    /// Wrap raw model output at `width` columns.
    ///
    /// Runs of whitespace (including newlines) collapse to a single space
    /// before wrapping, and words wider than `width` are split.
    pub fn wrap(raw: &str, width: usize) -> Self {
        Self {
            lines: text::wrap_lines(raw, width),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with `\n`.
    pub fn wrapped(&self) -> String {
        self.lines.join("\n")
    }

    /// Lines joined with a space, i.e. the summary as a single paragraph.
    pub fn flat(&self) -> String {
        self.lines.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Beam-search parameters handed to a [`Summarizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Minimum number of generated tokens.
    pub min_length: i64,
    /// Maximum number of generated tokens.
    pub max_length: i64,
    pub num_beams: i64,
    /// Exponent applied to sequence length when scoring beams; > 1.0 favours longer output.
    pub length_penalty: f64,
    pub early_stopping: bool,
    /// Prepended to the input text before tokenization.
    pub prefix: String,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            min_length: 200,
            max_length: 450,
            num_beams: 4,
            length_penalty: 2.0,
            early_stopping: true,
            prefix: "summarize: ".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Summarizer(#[from] SummarizerError),
}

/// Extract the text of a PDF held in memory.
pub fn extract(backend: &dyn PdfBackend, bytes: &[u8]) -> Result<ExtractedText, BackendError> {
    if !is_pdf(bytes) {
        return Err(BackendError::NotPdf);
    }
    let text = backend.extract_text(bytes)?;
    let text = ExtractedText::new(expand_ligatures(&text));
    tracing::debug!(
        bytes = bytes.len(),
        chars = text.char_count(),
        "extracted PDF text"
    );
    Ok(text)
}

/// Run the model on `text` and wrap its output at `width` columns.
pub fn summarize_text(
    summarizer: &dyn Summarizer,
    text: &str,
    width: usize,
) -> Result<Summary, SummarizerError> {
    let raw = summarizer.generate(text)?;
    if raw.trim().is_empty() {
        return Err(SummarizerError::EmptyOutput);
    }
    tracing::debug!(
        input_bytes = text.len(),
        output_bytes = raw.len(),
        "generated summary"
    );
    Ok(Summary::wrap(&raw, width))
}

/// Extract a PDF and summarize its text in one step.
pub fn summarize_pdf(
    backend: &dyn PdfBackend,
    summarizer: &dyn Summarizer,
    bytes: &[u8],
    width: usize,
) -> Result<(ExtractedText, Summary), SummarizeError> {
    let text = extract(backend, bytes)?;
    let summary = summarize_text(summarizer, &text.flattened(), width)?;
    Ok((text, summary))
}
