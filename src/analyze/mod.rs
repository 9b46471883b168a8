// src/analyze/mod.rs
//! Analysis pipeline entry: tokenization, sentiment, feature extraction,
//! scoring, and banded feedback behind one stateless analyzer type.

pub mod features;
pub mod feedback;
pub mod scoring;
pub mod tokenize;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::config::AnalyzerConfig;
use crate::sentiment::{LexiconSentiment, SentimentEngine};

// Re-export convenient types.
pub use crate::analyze::features::{compute_features, FeatureVector};
pub use crate::analyze::feedback::{level_for, render_feedback, RiskLevel, RiskThresholds};
pub use crate::analyze::scoring::{composite_score, ScoreWeights};
pub use crate::analyze::tokenize::normalize_and_tokenize;

/// Depression-biomarker analyzer.
///
/// Holds only immutable configuration (lexicon sets, weights, thresholds) and
/// a sentiment engine, so one instance can be shared freely across threads;
/// every call touches nothing but its own inputs.
pub struct TranscriptAnalyzer {
    engine: Arc<dyn SentimentEngine>,
    keywords: HashSet<String>,
    pronouns: HashSet<String>,
    pause_markers: HashSet<String>,
    weights: ScoreWeights,
    thresholds: RiskThresholds,
}

impl TranscriptAnalyzer {
    /// Build with the default lexicon sentiment engine.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_engine(config, Arc::new(LexiconSentiment::new()))
    }

    /// Build with an injected sentiment engine (fixture engines in tests).
    pub fn with_engine(config: AnalyzerConfig, engine: Arc<dyn SentimentEngine>) -> Self {
        Self {
            engine,
            keywords: config.keyword_set(),
            pronouns: config.pronoun_set(),
            pause_markers: config.pause_marker_set(),
            weights: config.weights,
            thresholds: config.thresholds,
        }
    }

    /// Analyze one transcript: returns the clamped [0, 100] score and the
    /// feature vector behind it. Total over any string, including "".
    pub fn analyze(&self, text: &str) -> (f32, FeatureVector) {
        let normalized = tokenize::normalize(text);
        let (words, all_tokens) = normalize_and_tokenize(&normalized);

        let sentiment = self.engine.polarity(&normalized);
        let features = compute_features(
            &words,
            &all_tokens,
            sentiment,
            &self.keywords,
            &self.pronouns,
            &self.pause_markers,
        );

        let score = composite_score(&features, normalized.chars().count(), &self.weights);
        (score, features)
    }

    /// Boundary variant for callers holding raw bytes: fails fast on
    /// non-text input instead of scoring garbage.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<(f32, FeatureVector)> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| anyhow!("transcript is not valid UTF-8 text: {e}"))?;
        if text.contains('\0') {
            return Err(anyhow!("transcript contains NUL bytes"));
        }
        Ok(self.analyze(text))
    }

    /// Band for a score, against this analyzer's thresholds.
    pub fn level_for(&self, score: f32) -> RiskLevel {
        level_for(score, &self.thresholds)
    }

    /// Templated human-readable summary for one analysis.
    pub fn feedback(&self, score: f32, features: &FeatureVector) -> String {
        render_feedback(score, features, &self.thresholds)
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }
}
