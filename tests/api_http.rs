// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /analyze
// - POST /batch
// - POST /analyze-audio (mocked and disabled transcribers)
// - GET /debug/history, /debug/rolling
// - GET /report

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::Request,
    Router,
};
use http::StatusCode;
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use speech_biomarker_analyzer::api::{router, AppState};
use speech_biomarker_analyzer::config::AnalyzerConfig;
use speech_biomarker_analyzer::stt::{DisabledTranscriber, MockTranscriber};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses, with a mock transcriber.
fn test_router() -> Router {
    let state = AppState::with_transcriber(
        AnalyzerConfig::default_seed(),
        Arc::new(MockTranscriber {
            fixed: "I feel so tired and empty".to_string(),
        }),
    );
    router(state)
}

fn test_router_without_stt() -> Router {
    let state =
        AppState::with_transcriber(AnalyzerConfig::default_seed(), Arc::new(DisabledTranscriber));
    router(state)
}

async fn read_json(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json body")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "ok", "health body should be 'ok'");
}

#[tokio::test]
async fn api_analyze_returns_expected_json_fields() {
    let app = test_router();

    let payload = json!({ "text": "I feel so hopeless and empty, I just want to cry all the time" });
    let req = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /analyze");

    let resp = app.oneshot(req).await.expect("oneshot /analyze");
    assert!(
        resp.status().is_success(),
        "POST /analyze should be 2xx, got {}",
        resp.status()
    );

    let v = read_json(resp).await;

    // Contract checks for UI consumers
    assert!(v.get("transcript").is_some(), "missing 'transcript'");
    assert!(v.get("depression_score").is_some(), "missing 'depression_score'");
    assert!(v.get("depression_level").is_some(), "missing 'depression_level'");
    assert!(v.get("feedback").is_some(), "missing 'feedback'");

    let features = v.get("features").expect("missing 'features'");
    for field in [
        "sentiment",
        "depression_keyword_ratio",
        "depression_keywords_found",
        "first_person_ratio",
        "word_count",
        "word_variety_ratio",
        "pause_ratio",
    ] {
        assert!(features.get(field).is_some(), "missing features.{field}");
    }

    let score = v["depression_score"].as_f64().expect("score is a number");
    assert!((0.0..=100.0).contains(&score));

    let found = v["features"]["depression_keywords_found"]
        .as_array()
        .expect("keyword list");
    assert!(found.iter().any(|k| k == "hopeless"));
}

#[tokio::test]
async fn api_batch_scores_multiple_items() {
    let app = test_router();

    let items = json!([
        { "text": "I went for a pleasant walk in the park" },
        { "text": "everything feels pointless and I am so tired" }
    ]);
    let req = Request::builder()
        .method("POST")
        .uri("/batch")
        .header("content-type", "application/json")
        .body(Body::from(items.to_string()))
        .expect("build POST /batch");

    let resp = app.oneshot(req).await.expect("oneshot /batch");
    assert!(
        resp.status().is_success(),
        "POST /batch should be 2xx, got {}",
        resp.status()
    );

    let arr = read_json(resp).await;
    let arr = arr.as_array().expect("batch response must be an array");
    assert_eq!(arr.len(), 2, "batch response length should match input");

    let calm = arr[0]["depression_score"].as_f64().expect("score");
    let heavy = arr[1]["depression_score"].as_f64().expect("score");
    assert!(heavy > calm, "depressive item should outscore the calm one");
}

#[tokio::test]
async fn api_analyze_audio_uses_the_transcriber() {
    let app = test_router();

    let req = Request::builder()
        .method("POST")
        .uri("/analyze-audio")
        .header("content-type", "audio/wav")
        .body(Body::from(vec![0u8; 64]))
        .expect("build POST /analyze-audio");

    let resp = app.oneshot(req).await.expect("oneshot /analyze-audio");
    assert!(
        resp.status().is_success(),
        "POST /analyze-audio should be 2xx, got {}",
        resp.status()
    );

    let v = read_json(resp).await;
    assert_eq!(v["transcript"], json!("I feel so tired and empty"));
    let found = v["features"]["depression_keywords_found"]
        .as_array()
        .expect("keyword list");
    assert!(found.iter().any(|k| k == "tired"));
}

#[tokio::test]
async fn api_analyze_audio_rejects_empty_payload() {
    let app = test_router();

    let req = Request::builder()
        .method("POST")
        .uri("/analyze-audio")
        .header("content-type", "audio/wav")
        .body(Body::empty())
        .expect("build empty POST /analyze-audio");

    let resp = app.oneshot(req).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let v = read_json(resp).await;
    assert!(v.get("error").is_some());
}

#[tokio::test]
async fn api_analyze_audio_reports_unavailable_transcription() {
    let app = test_router_without_stt();

    let req = Request::builder()
        .method("POST")
        .uri("/analyze-audio")
        .header("content-type", "audio/wav")
        .body(Body::from(vec![0u8; 64]))
        .expect("build POST /analyze-audio");

    let resp = app.oneshot(req).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let v = read_json(resp).await;
    assert!(v["error"]
        .as_str()
        .expect("error message")
        .contains("transcription"));
}

#[tokio::test]
async fn api_debug_endpoints_reflect_recent_analyses() {
    let app = test_router();

    for text in ["I feel sad today", "a calm ordinary afternoon"] {
        let req = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "text": text }).to_string()))
            .expect("build POST /analyze");
        let resp = app.clone().oneshot(req).await.expect("oneshot");
        assert!(resp.status().is_success());
    }

    let req = Request::builder()
        .method("GET")
        .uri("/debug/history")
        .body(Body::empty())
        .expect("build GET /debug/history");
    let resp = app.clone().oneshot(req).await.expect("oneshot history");
    let v = read_json(resp).await;
    let rows = v.as_array().expect("history array");
    assert_eq!(rows.len(), 2);
    assert!(rows[0].get("score").is_some());
    assert!(rows[0].get("level").is_some());

    let req = Request::builder()
        .method("GET")
        .uri("/debug/rolling")
        .body(Body::empty())
        .expect("build GET /debug/rolling");
    let resp = app.oneshot(req).await.expect("oneshot rolling");
    let v = read_json(resp).await;
    assert_eq!(v["count"], json!(2));
    assert!(v["average"].as_f64().expect("average") >= 0.0);
}

#[tokio::test]
async fn api_report_renders_html() {
    let app = test_router();

    let req = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": "I feel sad" }).to_string()))
        .expect("build POST /analyze");
    let resp = app.clone().oneshot(req).await.expect("oneshot analyze");
    assert!(resp.status().is_success());

    let req = Request::builder()
        .method("GET")
        .uri("/report")
        .body(Body::empty())
        .expect("build GET /report");
    let resp = app.oneshot(req).await.expect("oneshot report");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let html = String::from_utf8(bytes).expect("utf8");
    assert!(html.contains("<svg"));
    assert!(html.contains("Session Report"));
}
