use mupdf::{Document, TextPageFlags};

use pdfsum_core::{BackendError, PdfBackend};

/// MIME type handed to MuPDF so it picks the PDF handler for in-memory data.
const PDF_MIME: &str = "application/pdf";

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the server and core crates do not
/// transitively depend on it.
///
/// Text is read block by block and line by line, which matches the reading
/// order of PyMuPDF's `page.get_text()`. Each line ends with `\n` and pages
/// are joined with an extra `\n`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, BackendError> {
        let document = Document::from_bytes(bytes, PDF_MIME)
            .map_err(|e| BackendError::Open(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::Extraction(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::Extraction(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::Extraction(e.to_string()))?;

            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        tracing::debug!(pages = pages_text.len(), "mupdf extraction complete");
        Ok(pages_text.join("\n"))
    }
}
