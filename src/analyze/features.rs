//! Ratio-based linguistic features derived from the token streams.
//!
//! Every ratio divides by `max(denominator, 1)` so the empty transcript
//! produces zeros instead of NaN, and the keyword hit list preserves both
//! order and duplicates.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::sentiment::PolarityScores;

/// Named feature values packed alongside the sentiment tuple. This is the
/// explainable half of an analysis and serializes into the wire response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub sentiment: PolarityScores,
    pub depression_keyword_ratio: f32,
    pub depression_keywords_found: Vec<String>,
    pub first_person_ratio: f32,
    pub word_count: usize,
    pub word_variety_ratio: f32,
    pub pause_ratio: f32,
}

#[inline]
fn ratio(numerator: usize, denominator: usize) -> f32 {
    numerator as f32 / denominator.max(1) as f32
}

/// Derive the feature vector from the word/token streams and the sentiment
/// scores. Pure; the lexicon sets are the analyzer's immutable configuration.
pub fn compute_features(
    words: &[String],
    all_tokens: &[String],
    sentiment: PolarityScores,
    keywords: &HashSet<String>,
    pronouns: &HashSet<String>,
    pause_markers: &HashSet<String>,
) -> FeatureVector {
    let keywords_found: Vec<String> = words
        .iter()
        .filter(|w| keywords.contains(w.as_str()))
        .cloned()
        .collect();

    let fp_count = words.iter().filter(|w| pronouns.contains(w.as_str())).count();

    let distinct = words.iter().collect::<HashSet<_>>().len();

    let pause_count = all_tokens
        .iter()
        .filter(|t| pause_markers.contains(t.as_str()))
        .count();

    FeatureVector {
        sentiment,
        depression_keyword_ratio: ratio(keywords_found.len(), words.len()),
        depression_keywords_found: keywords_found,
        first_person_ratio: ratio(fp_count, words.len()),
        word_count: words.len(),
        word_variety_ratio: ratio(distinct, words.len()),
        pause_ratio: ratio(pause_count, all_tokens.len()),
    }
}
