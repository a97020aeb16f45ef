use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use pdfsum_core::{Settings, Summarizer, config_file};
use pdfsum_pdf_mupdf::MupdfBackend;
use pdfsum_web::{AppState, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = config_file::load_config(None)?;
    let settings = Settings::from_env(&config)?;

    let summarizer = load_summarizer(&settings).await?;
    let state = Arc::new(AppState::new(
        Arc::new(MupdfBackend::new()),
        summarizer,
        settings.wrap_width,
    ));

    let app = app(state, settings.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(feature = "bart")]
async fn load_summarizer(settings: &Settings) -> anyhow::Result<Arc<dyn Summarizer>> {
    use pdfsum_bart::{BartOptions, BartSummarizer};

    let options = BartOptions::from_settings(settings);
    tracing::info!(device = %options.device, "loading summarization model");
    let summarizer = tokio::task::spawn_blocking(move || BartSummarizer::load(options)).await??;
    Ok(Arc::new(summarizer))
}

#[cfg(not(feature = "bart"))]
async fn load_summarizer(_settings: &Settings) -> anyhow::Result<Arc<dyn Summarizer>> {
    Err(pdfsum_core::SummarizerError::NotCompiled.into())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
