//! Lexicon/rule polarity estimator.
//!
//! Produces VADER-style `{neg, pos, neu, compound}` proportions from an
//! embedded valence lexicon, with three rule layers on top of the raw word
//! valences: trailing negation (inverts and dampens), intensity boosters
//! ("very", "extremely", ...; dampened with distance), and exclamation
//! emphasis. Fully deterministic; no I/O.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, f32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f32>>(raw).expect("valid sentiment lexicon")
});

/// Inversion factor applied to a valence inside a negation window.
const NEGATION_SCALAR: f32 = -0.74;
/// Magnitude added (or removed) by an intensity booster.
const BOOST_INCR: f32 = 0.293;
const BOOST_DECR: f32 = -0.293;
/// Normalization constant for the compound score.
const NORMALIZATION_ALPHA: f32 = 15.0;
/// Per-`!` emphasis, capped at four marks.
const EXCLAMATION_STEP: f32 = 0.292;
const EXCLAMATION_CAP: usize = 4;

/// Polarity of one utterance. `neg`/`pos`/`neu` are proportions in [0, 1]
/// summing to ~1 for non-empty input; `compound` is the normalized total
/// valence in [-1, 1]. Empty input yields all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f32,
    pub pos: f32,
    pub neu: f32,
    pub compound: f32,
}

impl PolarityScores {
    pub const ZERO: Self = Self {
        neg: 0.0,
        pos: 0.0,
        neu: 0.0,
        compound: 0.0,
    };
}

/// Narrow seam over the polarity engine so the concrete implementation can be
/// swapped for a fixture in tests.
pub trait SentimentEngine: Send + Sync {
    fn polarity(&self, text: &str) -> PolarityScores;
}

/// Default engine backed by the embedded lexicon.
#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_valence(&self, w: &str) -> f32 {
        *LEXICON.get(w).unwrap_or(&0.0)
    }
}

impl SentimentEngine for LexiconSentiment {
    fn polarity(&self, text: &str) -> PolarityScores {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut valences: Vec<f32> = Vec::with_capacity(tokens.len());

        for i in 0..tokens.len() {
            let w = tokens[i].as_str();

            // Boosters carry no valence of their own.
            if booster_value(w).is_some() {
                valences.push(0.0);
                continue;
            }

            let mut v = self.word_valence(w);
            if v != 0.0 {
                // Intensity boosters up to three tokens back, damped with distance.
                for k in 1..=3usize {
                    if i >= k {
                        if let Some(b) = booster_value(tokens[i - k].as_str()) {
                            let damp = match k {
                                1 => 1.0,
                                2 => 0.95,
                                _ => 0.9,
                            };
                            v += v.signum() * b * damp;
                        }
                    }
                }

                // Negation in the trailing 1..=3 window inverts and dampens.
                let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
                if negated {
                    v *= NEGATION_SCALAR;
                }
            }
            valences.push(v);
        }

        score_valence(&valences, text)
    }
}

/// Fold per-token valences into the four-part polarity tuple.
fn score_valence(valences: &[f32], text: &str) -> PolarityScores {
    if valences.is_empty() {
        return PolarityScores::ZERO;
    }

    let punct = exclamation_emphasis(text);

    let mut sum: f32 = valences.iter().sum();
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0);

    let mut pos_sum = 0.0f32;
    let mut neg_sum = 0.0f32;
    let mut neu_count = 0.0f32;
    for &v in valences {
        if v > 0.0 {
            pos_sum += v + 1.0;
        } else if v < 0.0 {
            neg_sum += v - 1.0;
        } else {
            neu_count += 1.0;
        }
    }

    // Exclamation emphasis goes to whichever side already dominates.
    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    if total <= 0.0 {
        return PolarityScores::ZERO;
    }

    PolarityScores {
        neg: neg_sum.abs() / total,
        pos: pos_sum / total,
        neu: neu_count / total,
        compound,
    }
}

fn exclamation_emphasis(text: &str) -> f32 {
    let bangs = text.chars().filter(|&c| c == '!').count().min(EXCLAMATION_CAP);
    bangs as f32 * EXCLAMATION_STEP
}

/// Module-level tokenization: alphanumeric tokens, lower-case.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
}

/// Negators, including contraction stems after apostrophe splitting
/// ("isn't" tokenizes as "isn" + "t").
fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "none"
            | "nothing"
            | "nobody"
            | "nowhere"
            | "neither"
            | "nor"
            | "cannot"
            | "without"
            | "hardly"
            | "rarely"
            | "scarcely"
            | "isn"
            | "wasn"
            | "aren"
            | "weren"
            | "don"
            | "didn"
            | "doesn"
            | "hasn"
            | "haven"
            | "hadn"
            | "couldn"
            | "shouldn"
            | "wouldn"
            | "mustn"
            | "ain"
    )
}

fn booster_value(tok: &str) -> Option<f32> {
    let b = match tok {
        "absolutely" | "completely" | "deeply" | "especially" | "extremely" | "incredibly"
        | "particularly" | "really" | "so" | "terribly" | "totally" | "utterly" | "very" => {
            BOOST_INCR
        }
        "barely" | "little" | "marginally" | "occasionally" | "partly" | "slightly"
        | "somewhat" => BOOST_DECR,
        _ => return None,
    };
    Some(b)
}
