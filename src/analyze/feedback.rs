//! Risk banding and templated feedback text.
//!
//! The five bands partition [0, 100]: each boundary is exclusive on its upper
//! side except the final band, which includes 100. Feedback reports the band
//! and score, the triggered observations, a risk-tiered recommendation, and a
//! standing non-diagnostic disclaimer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::features::FeatureVector;

/// Negative-sentiment proportion above which the observation is reported.
const NEG_SENTIMENT_NOTE: f32 = 0.3;
/// First-person ratio above which elevated self-focus is reported.
const SELF_FOCUS_NOTE: f32 = 0.15;
/// At most this many distinct keywords are listed; the rest become a count.
const KEYWORDS_SHOWN: usize = 5;

/// Qualitative risk band, a pure function of the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "low risk")]
    Low,
    #[serde(rename = "mild risk")]
    Mild,
    #[serde(rename = "moderate risk")]
    Moderate,
    #[serde(rename = "high risk")]
    High,
    #[serde(rename = "severe risk")]
    Severe,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low risk",
            RiskLevel::Mild => "mild risk",
            RiskLevel::Moderate => "moderate risk",
            RiskLevel::High => "high risk",
            RiskLevel::Severe => "severe risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band boundaries. Each names the *lower* bound of the band above it, so the
/// defaults place "mild risk" at [20, 40) and "severe risk" at [80, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub low: f32,
    pub mild: f32,
    pub moderate: f32,
    pub high: f32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: 20.0,
            mild: 40.0,
            moderate: 60.0,
            high: 80.0,
        }
    }
}

/// Map a score onto its band.
pub fn level_for(score: f32, t: &RiskThresholds) -> RiskLevel {
    if score < t.low {
        RiskLevel::Low
    } else if score < t.mild {
        RiskLevel::Mild
    } else if score < t.moderate {
        RiskLevel::Moderate
    } else if score < t.high {
        RiskLevel::High
    } else {
        RiskLevel::Severe
    }
}

/// Render the human-readable feedback summary for one analysis.
pub fn render_feedback(score: f32, features: &FeatureVector, t: &RiskThresholds) -> String {
    let level = level_for(score, t);

    let mut out = format!(
        "Depression risk level: {} ({score:.1}/100)\n\n",
        level.as_str().to_uppercase()
    );

    out.push_str("Observations:\n");

    if features.sentiment.neg > NEG_SENTIMENT_NOTE {
        out.push_str("- High negative emotional content detected in speech\n");
    }

    if !features.depression_keywords_found.is_empty() {
        // Distinct keywords in first-occurrence order; duplicates stay in the
        // feature vector itself.
        let mut distinct: Vec<&str> = Vec::new();
        for w in &features.depression_keywords_found {
            if !distinct.contains(&w.as_str()) {
                distinct.push(w.as_str());
            }
        }
        let shown = &distinct[..distinct.len().min(KEYWORDS_SHOWN)];
        out.push_str(&format!(
            "- Depression-related keywords detected: {}\n",
            shown.join(", ")
        ));
        if distinct.len() > KEYWORDS_SHOWN {
            out.push_str(&format!("  (and {} more)\n", distinct.len() - KEYWORDS_SHOWN));
        }
    }

    if features.first_person_ratio > SELF_FOCUS_NOTE {
        out.push_str("- High self-focus in speech patterns\n");
    }

    out.push_str("\nRecommendations:\n");
    if score >= t.moderate {
        out.push_str("- Consider consulting a mental health professional\n");
        out.push_str("- This tool is not diagnostic but suggests potential concern\n");
    } else if score >= t.mild {
        out.push_str("- Consider monitoring mood patterns\n");
        out.push_str("- Practice self-care activities\n");
    } else {
        out.push_str("- Continue monitoring for any significant changes\n");
    }

    out.push_str("\nNote: This is an automated analysis and not a clinical diagnosis.");
    out
}
