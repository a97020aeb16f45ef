use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use pdfsum_core::is_pdf;

use crate::error::ApiError;

/// Name of the multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// An uploaded file with its data and metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parse a multipart form upload, returning the `file` field.
///
/// Unknown fields are drained and ignored. A body over the configured
/// limit is reported as 413, any other malformed body as 400.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, ApiError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read form field", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == FILE_FIELD {
            let filename = field.file_name().unwrap_or("upload.pdf").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error("Failed to read file data", e))?
                .to_vec();

            check_pdf(&filename, &data).map_err(ApiError::BadRequest)?;
            file = Some(UploadedFile { filename, data });
        } else {
            field
                .bytes()
                .await
                .map_err(|e| multipart_error("Failed to read form field", e))?;
        }
    }

    file.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))
}

fn multipart_error(context: &str, err: MultipartError) -> ApiError {
    let message = format!("{}: {}", context, err.body_text());
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(message)
    } else {
        ApiError::BadRequest(message)
    }
}

/// Verify the upload is a PDF from its extension and magic bytes.
fn check_pdf(filename: &str, data: &[u8]) -> Result<(), String> {
    if is_pdf(data) {
        return Ok(());
    }
    if filename.to_lowercase().ends_with(".pdf") {
        return Err("File has .pdf extension but doesn't appear to be a valid PDF".to_string());
    }
    Err("Unsupported file type. Please upload a PDF file.".to_string())
}
