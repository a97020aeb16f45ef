use axum::Json;
use axum::extract::{Multipart, State};
use std::sync::Arc;

use pdfsum_core::snippet;

use crate::error::ApiError;
use crate::models::UploadResponse;
use crate::state::AppState;
use crate::upload::{self, UploadedFile};

/// `POST /uploadfile/`: extract an uploaded PDF and summarize it.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let UploadedFile { filename, data } = upload::parse_multipart(multipart).await?;

    tracing::info!(filename = %filename, bytes = data.len(), "received upload");

    // Extraction and generation both block (MuPDF, libtorch).
    let (text, summary) = tokio::task::spawn_blocking(move || {
        pdfsum_core::summarize_pdf(
            state.pdf.as_ref(),
            state.summarizer.as_ref(),
            &data,
            state.wrap_width,
        )
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Summarization task failed: {}", e)))??;

    Ok(Json(UploadResponse {
        filename,
        extracted_text_snippet: snippet(&text.flattened()),
        summary: summary.flat(),
    }))
}
