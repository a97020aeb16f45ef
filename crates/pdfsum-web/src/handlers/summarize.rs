use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{SummarizeQuery, SummaryResponse};
use crate::state::AppState;

/// `GET /summarize_pdf/?pdf_path=...`: summarize the parameter value as text.
///
/// Any failure is reported as 400 `Error processing PDF: ...`.
pub async fn summarize_query(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SummarizeQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Unprocessable(e.body_text()))?;

    let summary = tokio::task::spawn_blocking(move || {
        pdfsum_core::summarize_text(state.summarizer.as_ref(), &query.pdf_path, state.wrap_width)
    })
    .await
    .map_err(ApiError::pdf_processing)?
    .map_err(ApiError::pdf_processing)?;

    Ok(Json(SummaryResponse {
        summary: summary.wrapped(),
    }))
}
