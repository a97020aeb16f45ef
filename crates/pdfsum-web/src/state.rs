use std::sync::Arc;

use pdfsum_core::{PdfBackend, Summarizer};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub pdf: Arc<dyn PdfBackend>,
    pub summarizer: Arc<dyn Summarizer>,
    /// Column width summaries are wrapped at.
    pub wrap_width: usize,
}

impl AppState {
    pub fn new(
        pdf: Arc<dyn PdfBackend>,
        summarizer: Arc<dyn Summarizer>,
        wrap_width: usize,
    ) -> Self {
        Self {
            pdf,
            summarizer,
            wrap_width,
        }
    }
}
