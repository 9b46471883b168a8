// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod analyze;
pub mod api;
pub mod config;
pub mod history;
pub mod metrics;
pub mod report;
pub mod rolling;
pub mod sentiment;
pub mod stt;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{
    FeatureVector, RiskLevel, RiskThresholds, ScoreWeights, TranscriptAnalyzer,
};
pub use crate::api::{router, AppState};
pub use crate::config::{AnalyzerConfig, ServerSettings};
pub use crate::sentiment::{LexiconSentiment, PolarityScores, SentimentEngine};
pub use crate::stt::{DynTranscriber, Transcriber};
