use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use pdfsum_core::SummarizeError;

use crate::models::ErrorBody;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The client sent something we cannot process (bad upload, not a PDF).
    #[error("{0}")]
    BadRequest(String),
    /// The request body exceeded the upload limit.
    #[error("{0}")]
    PayloadTooLarge(String),
    /// Required query parameters are missing or malformed.
    #[error("{0}")]
    Unprocessable(String),
    /// The model or a worker task failed.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Catch-all used by `/summarize_pdf/`: every failure is a 400.
    pub fn pdf_processing(err: impl std::fmt::Display) -> Self {
        ApiError::BadRequest(format!("Error processing PDF: {err}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SummarizeError> for ApiError {
    fn from(err: SummarizeError) -> Self {
        match err {
            SummarizeError::Backend(e) => ApiError::BadRequest(e.to_string()),
            SummarizeError::Summarizer(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
