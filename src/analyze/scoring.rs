//! Composite risk scoring.
//!
//! Combines the sentiment tuple and the linguistic ratios into one bounded
//! score via fixed, configurable weights. The formula is total: every valid
//! feature vector maps to a score in [0, 100] with no error path.

use serde::{Deserialize, Serialize};

use super::features::FeatureVector;

/// Word count at which the speech-rate penalty fully vanishes.
const SPEECH_RATE_WORDS: f32 = 150.0;
/// Utterances at or below this many normalized characters skip the
/// speech-rate penalty entirely.
const SPEECH_RATE_CHAR_GATE: usize = 50;

/// Per-signal weights. Overridable through configuration; defaults follow the
/// clinical-heuristic calibration of the scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub neg_sentiment: f32,
    pub keyword: f32,
    pub self_focus: f32,
    pub speech_rate: f32,
    pub word_variety: f32,
    pub pause: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            neg_sentiment: 2.5,
            keyword: 2.0,
            self_focus: 1.0,
            speech_rate: 1.5,
            word_variety: 1.0,
            pause: 1.0,
        }
    }
}

/// Compute the composite depression-risk score in [0, 100].
///
/// `normalized_chars` is the character length of the normalized transcript;
/// it gates the speech-rate term so short utterances are not penalized for
/// "low rate".
pub fn composite_score(features: &FeatureVector, normalized_chars: usize, w: &ScoreWeights) -> f32 {
    let mut raw = 0.0f32;

    raw += w.neg_sentiment * (features.sentiment.neg * 100.0);
    raw += w.keyword * (features.depression_keyword_ratio * 100.0);
    // Self-focus carries half the scale of the lexical signals.
    raw += w.self_focus * (features.first_person_ratio * 50.0);

    let speech_rate_factor = if normalized_chars > SPEECH_RATE_CHAR_GATE {
        (1.0 - features.word_count as f32 / SPEECH_RATE_WORDS).max(0.0)
    } else {
        0.0
    };
    raw += w.speech_rate * (speech_rate_factor * 50.0);

    let word_variety_factor = (1.0 - features.word_variety_ratio).max(0.0);
    raw += w.word_variety * (word_variety_factor * 50.0);

    raw += w.pause * (features.pause_ratio * 50.0);

    raw.clamp(0.0, 100.0)
}
