use serde::{Deserialize, Serialize};

/// Response of `POST /uploadfile/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    /// First 200 characters of the extracted text followed by `...`.
    pub extracted_text_snippet: String,
    /// Summary as a single paragraph.
    pub summary: String,
}

/// Response of `GET /summarize_pdf/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Summary wrapped into lines joined by `\n`.
    pub summary: String,
}

/// Query string of `GET /summarize_pdf/`.
///
/// Despite the name, the value is summarized as text; no file is opened.
#[derive(Debug, Deserialize)]
pub struct SummarizeQuery {
    pub pdf_path: String,
}

/// Error body, shaped like FastAPI's `HTTPException` detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
