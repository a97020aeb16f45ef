use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;
pub mod template;
pub mod upload;

pub use state::AppState;

/// Build the application router.
///
/// Upload bodies larger than `max_upload_bytes` are rejected with 413.
pub fn app(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/uploadfile/", post(handlers::upload::upload_file))
        .route("/uploadfile", post(handlers::upload::upload_file))
        .route("/summarize_pdf/", get(handlers::summarize::summarize_query))
        .route("/summarize_pdf", get(handlers::summarize::summarize_query))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
