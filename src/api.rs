//! HTTP/WebSocket surface. Thin adapters over the pure analyzer: every
//! handler normalizes its transport concerns, calls `run_analysis`, and
//! returns the same JSON shape.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::analyze::{FeatureVector, RiskLevel, TranscriptAnalyzer};
use crate::config::AnalyzerConfig;
use crate::history::History;
use crate::report;
use crate::rolling::RollingWindow;
use crate::stt::{build_transcriber, DynTranscriber};

#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<TranscriptAnalyzer>,
    history: Arc<History>,
    rolling: Arc<RollingWindow>,
    transcriber: DynTranscriber,
}

impl AppState {
    /// State for the real binary: transcriber resolved from env/config.
    pub fn from_config(config: AnalyzerConfig) -> Self {
        Self::with_transcriber(config, build_transcriber())
    }

    /// State with an injected transcriber (mocks in tests).
    pub fn with_transcriber(config: AnalyzerConfig, transcriber: DynTranscriber) -> Self {
        Self {
            analyzer: Arc::new(TranscriptAnalyzer::new(config)),
            history: Arc::new(History::with_capacity(2000)),
            rolling: Arc::new(RollingWindow::new_24h()),
            transcriber,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .route("/batch", post(analyze_batch))
        .route("/analyze-audio", post(analyze_audio))
        .route("/ws", get(ws_upgrade))
        .route("/debug/history", get(debug_history))
        .route("/debug/rolling", get(debug_rolling))
        .route("/report", get(report_page))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct AnalyzeReq {
    text: String,
}

#[derive(serde::Serialize)]
struct AnalyzeResp {
    transcript: String,
    depression_score: f32,
    depression_level: RiskLevel,
    features: FeatureVector,
    feedback: String,
}

/// Shared analysis path for every transport: score, band, feedback, then the
/// bookkeeping (history, rolling window, counters, anonymized log line).
fn run_analysis(state: &AppState, text: String) -> AnalyzeResp {
    let (score, features) = state.analyzer.analyze(&text);
    let level = state.analyzer.level_for(score);
    let feedback = state.analyzer.feedback(score, &features);

    state.history.push(score, level, &features);
    state.rolling.record(score, None);
    counter!("transcripts_analyzed_total", "level" => level.as_str()).increment(1);

    // Never log raw transcripts; hashed id + aggregates only.
    info!(id = %anon_hash(&text), score, level = %level, "transcript analyzed");

    AnalyzeResp {
        transcript: text,
        depression_score: score,
        depression_level: level,
        features,
        feedback,
    }
}

async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeReq>) -> Json<AnalyzeResp> {
    Json(run_analysis(&state, body.text))
}

async fn analyze_batch(
    State(state): State<AppState>,
    Json(items): Json<Vec<AnalyzeReq>>,
) -> Json<Vec<AnalyzeResp>> {
    let out = items
        .into_iter()
        .map(|it| run_analysis(&state, it.text))
        .collect::<Vec<_>>();
    Json(out)
}

async fn analyze_audio(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if body.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "empty audio payload");
    }

    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    match state.transcriber.transcribe(&body, &mime).await {
        Some(transcript) => Json(run_analysis(&state, transcript)).into_response(),
        None => error_response(
            StatusCode::BAD_GATEWAY,
            "transcription failed or not configured",
        ),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_session(socket, state))
}

/// Live loop: each text frame is one utterance, answered with the same JSON
/// shape as `/analyze`; anything else gets an error frame.
async fn ws_session(mut socket: WebSocket, state: AppState) {
    while let Some(Ok(msg)) = socket.recv().await {
        let reply = match msg {
            Message::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    serde_json::json!({ "error": "empty transcript frame" }).to_string()
                } else {
                    let resp = run_analysis(&state, trimmed.to_string());
                    serde_json::to_string(&resp).unwrap_or_else(|_| "{}".to_string())
                }
            }
            Message::Binary(_) => {
                serde_json::json!({ "error": "binary frames are not supported; send transcript text" })
                    .to_string()
            }
            Message::Close(_) => break,
            // Ping/Pong are answered by axum itself.
            _ => continue,
        };
        if socket.send(Message::Text(reply.into())).await.is_err() {
            break;
        }
    }
}

#[derive(serde::Serialize)]
struct RollingInfo {
    window_secs: u64,
    average: f32,
    count: usize,
}

async fn debug_rolling(State(state): State<AppState>) -> Json<RollingInfo> {
    let (avg, n) = state.rolling.average_and_count();
    Json(RollingInfo {
        window_secs: state.rolling.window_secs(),
        average: avg,
        count: n,
    })
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<crate::history::HistoryEntry>> {
    Json(state.history.snapshot_last_n(10))
}

async fn report_page(State(state): State<AppState>) -> Html<String> {
    let summary = state.history.summary();
    let entries = state.history.snapshot_last_n(50);
    Html(report::render_html(&summary, &entries))
}

/// Short, non-reversible id for log correlation without exposing speech.
fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
