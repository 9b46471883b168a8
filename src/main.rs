//! Speech Biomarker Analyzer — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use speech_biomarker_analyzer::api;
use speech_biomarker_analyzer::config::{AnalyzerConfig, ServerSettings};
use speech_biomarker_analyzer::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("speech_biomarker_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = AnalyzerConfig::load_default()?;
    let metrics = Metrics::init(&config.thresholds);

    let state = api::AppState::from_config(config);
    let app = api::router(state).merge(metrics.router());

    let settings = ServerSettings::from_env();
    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "speech biomarker analyzer listening");

    axum::serve(listener, app).await?;
    Ok(())
}
