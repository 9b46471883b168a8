//! Speech-to-text boundary: provider abstraction over the Deepgram
//! prerecorded API, plus disabled and mock fallbacks.
//!
//! The analyzer itself never sees audio; this module turns a byte payload
//! into a transcript string or `None`. No audio processing happens here.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Config loaded from `config/stt.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    pub enabled: bool,
    /// Deepgram model id; defaults to "nova-3".
    pub model: Option<String>,
    /// BCP-47 language tag; defaults to "en".
    pub language: Option<String>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: None,
            language: None,
        }
    }
}

/// Load config from `config/stt.json`. Reading/parsing failures fall back to
/// the defaults.
pub fn load_stt_config() -> SttConfig {
    let path = Path::new("config/stt.json");
    match std::fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => SttConfig::default(),
    }
}

/// Trait object used by handlers and the CLI.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio payload. `None` when transcription is unavailable
    /// or the provider produced no usable text.
    async fn transcribe(&self, audio: &[u8], mime: &str) -> Option<String>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynTranscriber = Arc<dyn Transcriber>;

/// Factory: build a transcriber from config and environment.
///
/// * `STT_TEST_MODE=mock` returns a deterministic mock.
/// * A disabled config or a missing `DEEPGRAM_API_KEY` returns the disabled
///   fallback.
pub fn build_transcriber() -> DynTranscriber {
    if std::env::var("STT_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockTranscriber {
            fixed: "I feel fine today".to_string(),
        });
    }

    let cfg = load_stt_config();
    if !cfg.enabled {
        return Arc::new(DisabledTranscriber);
    }

    let deepgram = DeepgramTranscriber::new(&cfg);
    if deepgram.api_key.is_empty() {
        return Arc::new(DisabledTranscriber);
    }
    Arc::new(deepgram)
}

/// Deepgram prerecorded transcription. Requires `DEEPGRAM_API_KEY`.
pub struct DeepgramTranscriber {
    http: reqwest::Client,
    api_key: String,
    model: String,
    language: String,
}

impl DeepgramTranscriber {
    pub fn new(cfg: &SttConfig) -> Self {
        let api_key = std::env::var("DEEPGRAM_API_KEY").unwrap_or_default();
        let http = reqwest::Client::builder()
            .user_agent("speech-biomarker-analyzer/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            model: cfg.model.clone().unwrap_or_else(|| "nova-3".to_string()),
            language: cfg.language.clone().unwrap_or_else(|| "en".to_string()),
        }
    }
}

#[async_trait]
impl Transcriber for DeepgramTranscriber {
    async fn transcribe(&self, audio: &[u8], mime: &str) -> Option<String> {
        if self.api_key.is_empty() || audio.is_empty() {
            return None;
        }

        #[derive(Deserialize)]
        struct Resp {
            results: Results,
        }
        #[derive(Deserialize)]
        struct Results {
            channels: Vec<Channel>,
        }
        #[derive(Deserialize)]
        struct Channel {
            alternatives: Vec<Alternative>,
        }
        #[derive(Deserialize)]
        struct Alternative {
            transcript: String,
        }

        let url = format!(
            "https://api.deepgram.com/v1/listen?model={}&language={}&smart_format=true",
            self.model, self.language
        );

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", mime)
            .body(audio.to_vec())
            .send()
            .await
            .ok()?;

        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), "deepgram transcription request failed");
            return None;
        }

        let body: Resp = resp.json().await.ok()?;
        let transcript = body
            .results
            .channels
            .first()?
            .alternatives
            .first()?
            .transcript
            .trim()
            .to_string();

        if transcript.is_empty() {
            None
        } else {
            Some(transcript)
        }
    }

    fn provider_name(&self) -> &'static str {
        "deepgram"
    }
}

/// Returns `None` always; used when transcription is not configured.
pub struct DisabledTranscriber;

#[async_trait]
impl Transcriber for DisabledTranscriber {
    async fn transcribe(&self, _audio: &[u8], _mime: &str) -> Option<String> {
        None
    }

    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic mock for tests and local runs.
#[derive(Clone)]
pub struct MockTranscriber {
    pub fixed: String,
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &[u8], _mime: &str) -> Option<String> {
        Some(self.fixed.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Best-effort MIME type from a file extension, for the CLI path.
pub fn mime_for_path(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
        .as_str()
    {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" | "mp4" => "audio/mp4",
        "webm" => "audio/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_its_fixture() {
        let t = MockTranscriber {
            fixed: "hello there".into(),
        };
        assert_eq!(t.transcribe(b"bytes", "audio/wav").await.as_deref(), Some("hello there"));
        assert_eq!(t.provider_name(), "mock");
    }

    #[tokio::test]
    async fn disabled_returns_none() {
        let t = DisabledTranscriber;
        assert!(t.transcribe(b"bytes", "audio/wav").await.is_none());
    }

    #[serial_test::serial]
    #[test]
    fn factory_honors_test_mode() {
        std::env::set_var("STT_TEST_MODE", "mock");
        let t = build_transcriber();
        std::env::remove_var("STT_TEST_MODE");
        assert_eq!(t.provider_name(), "mock");
    }

    #[serial_test::serial]
    #[test]
    fn factory_disables_without_api_key() {
        std::env::remove_var("STT_TEST_MODE");
        std::env::remove_var("DEEPGRAM_API_KEY");
        let t = build_transcriber();
        assert_eq!(t.provider_name(), "disabled");
    }

    #[test]
    fn mime_guess_covers_common_audio() {
        assert_eq!(mime_for_path("a.wav"), "audio/wav");
        assert_eq!(mime_for_path("a.MP3"), "audio/mpeg");
        assert_eq!(mime_for_path("a.bin"), "application/octet-stream");
    }
}
