//! history.rs — in-memory record of recent analyses for diagnostics and the
//! session report. Bounded; nothing is persisted.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyze::{FeatureVector, RiskLevel};

/// Compact imprint of one analysis: enough for trend charts and quick
/// diagnostics without retaining the transcript itself.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub ts: DateTime<Utc>,
    pub score: f32,
    pub level: RiskLevel,
    pub word_count: usize,
    /// Up to three distinct keyword hits, first-occurrence order.
    pub top_keywords: Vec<String>,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

/// Aggregate view over everything currently in the window.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub total_samples: usize,
    pub average_score: f32,
    pub max_score: f32,
    pub level_distribution: BTreeMap<String, usize>,
    pub score_trend: Vec<f32>,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, score: f32, level: RiskLevel, features: &FeatureVector) {
        let mut top_keywords: Vec<String> = Vec::new();
        for w in &features.depression_keywords_found {
            if !top_keywords.contains(w) {
                top_keywords.push(w.clone());
                if top_keywords.len() == 3 {
                    break;
                }
            }
        }

        let entry = HistoryEntry {
            ts: Utc::now(),
            score,
            level,
            word_count: features.word_count,
            top_keywords,
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("history mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> SessionSummary {
        let v = self.inner.lock().expect("history mutex poisoned");

        let mut level_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut sum = 0.0f32;
        let mut max = 0.0f32;
        for e in v.iter() {
            sum += e.score;
            max = max.max(e.score);
            *level_distribution
                .entry(e.level.as_str().to_string())
                .or_insert(0) += 1;
        }
        let average_score = if v.is_empty() { 0.0 } else { sum / v.len() as f32 };

        SessionSummary {
            total_samples: v.len(),
            average_score,
            max_score: max,
            level_distribution,
            score_trend: v.iter().map(|e| e.score).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::PolarityScores;

    fn fv(keywords: &[&str], word_count: usize) -> FeatureVector {
        FeatureVector {
            sentiment: PolarityScores::ZERO,
            depression_keyword_ratio: 0.0,
            depression_keywords_found: keywords.iter().map(|s| s.to_string()).collect(),
            first_person_ratio: 0.0,
            word_count,
            word_variety_ratio: 1.0,
            pause_ratio: 0.0,
        }
    }

    #[test]
    fn capacity_is_enforced_oldest_first() {
        let h = History::with_capacity(3);
        for i in 0..5 {
            h.push(i as f32, RiskLevel::Low, &fv(&[], 1));
        }
        let snap = h.snapshot_last_n(10);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0].score, 2.0);
        assert_eq!(snap[2].score, 4.0);
    }

    #[test]
    fn top_keywords_are_distinct_and_capped() {
        let h = History::with_capacity(10);
        h.push(
            10.0,
            RiskLevel::Low,
            &fv(&["sad", "sad", "empty", "numb", "lost"], 8),
        );
        let snap = h.snapshot_last_n(1);
        assert_eq!(snap[0].top_keywords, vec!["sad", "empty", "numb"]);
    }

    #[test]
    fn summary_aggregates_scores_and_bands() {
        let h = History::with_capacity(10);
        h.push(10.0, RiskLevel::Low, &fv(&[], 4));
        h.push(30.0, RiskLevel::Mild, &fv(&[], 4));
        h.push(50.0, RiskLevel::Moderate, &fv(&[], 4));

        let s = h.summary();
        assert_eq!(s.total_samples, 3);
        assert!((s.average_score - 30.0).abs() < 1e-6);
        assert!((s.max_score - 50.0).abs() < 1e-6);
        assert_eq!(s.score_trend, vec![10.0, 30.0, 50.0]);
        assert_eq!(s.level_distribution.get("mild risk"), Some(&1));
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let h = History::with_capacity(10);
        let s = h.summary();
        assert_eq!(s.total_samples, 0);
        assert_eq!(s.average_score, 0.0);
        assert!(s.score_trend.is_empty());
    }
}
