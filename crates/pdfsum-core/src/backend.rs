use thiserror::Error;

/// Leading bytes of every PDF file.
pub const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("not a PDF document")]
    NotPdf,
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
}

/// Trait for PDF text extraction backends.
///
/// Implementors turn an in-memory PDF into plain text: every page in order,
/// one line per text line, pages separated by a blank line.
pub trait PdfBackend: Send + Sync {
    /// Extract the full text content of a PDF held in memory.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, BackendError>;
}

/// Whether `bytes` starts with the PDF signature.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("failed to load model: {0}")]
    Load(String),
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("model returned an empty summary")]
    EmptyOutput,
    #[error("summarization support not compiled in (enable the `bart` feature)")]
    NotCompiled,
}

/// A sequence-to-sequence model that produces an abstractive summary.
///
/// Implementations own their loaded weights; `generate` may block for a long
/// time and must not be called from an async worker thread.
pub trait Summarizer: Send + Sync {
    /// Human-readable model identifier, e.g. `facebook/bart-large-cnn`.
    fn model_name(&self) -> &str;

    /// Generate a summary of `text`. Returns the decoded output with special
    /// tokens removed and no line wrapping applied.
    fn generate(&self, text: &str) -> Result<String, SummarizerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_magic_detection() {
        assert!(is_pdf(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3"));
        assert!(!is_pdf(b"PK\x03\x04"));
        assert!(!is_pdf(b"%PD"));
        assert!(!is_pdf(b""));
    }
}
