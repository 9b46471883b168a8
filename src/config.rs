//! Analyzer and server configuration.
//!
//! Weights, band thresholds, and the fixed lexicons (keywords, first-person
//! pronouns, pause markers) load once at startup from a TOML file and are
//! never mutated afterwards. Resolution order: `$ANALYZER_CONFIG_PATH`, then
//! `config/analyzer.toml`, then the compiled-in seed.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyze::feedback::RiskThresholds;
use crate::analyze::scoring::ScoreWeights;

pub const DEFAULT_ANALYZER_CONFIG_PATH: &str = "config/analyzer.toml";
pub const ENV_ANALYZER_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";

/// Immutable analyzer configuration. Every field is overridable from TOML;
/// omitted sections fall back to the seed values below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub weights: ScoreWeights,
    pub thresholds: RiskThresholds,
    pub depression_keywords: Vec<String>,
    pub first_person_pronouns: Vec<String>,
    pub pause_markers: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl AnalyzerConfig {
    /// Built-in seed: the fixed depression-keyword list, the self-focus
    /// pronouns, and the punctuation pause proxies.
    pub fn default_seed() -> Self {
        let depression_keywords = [
            "sad",
            "lonely",
            "depressed",
            "hopeless",
            "tired",
            "exhausted",
            "worthless",
            "guilty",
            "empty",
            "numb",
            "pain",
            "hurt",
            "cry",
            "crying",
            "suicide",
            "die",
            "death",
            "alone",
            "darkness",
            "useless",
            "failure",
            "miserable",
            "anxious",
            "worried",
            "struggle",
            "suffering",
            "unhappy",
            "desperate",
            "helpless",
            "pointless",
            "meaningless",
            "burden",
            "lost",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let first_person_pronouns = ["i", "me", "my", "mine", "myself"]
            .into_iter()
            .map(String::from)
            .collect();

        let pause_markers = [".", ",", "...", ";", "—"]
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            weights: ScoreWeights::default(),
            thresholds: RiskThresholds::default(),
            depression_keywords,
            first_person_pronouns,
            pause_markers,
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parsing analyzer config TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config at {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Load using env var + fallbacks:
    /// 1) `$ANALYZER_CONFIG_PATH` (must exist if set)
    /// 2) `config/analyzer.toml`
    /// 3) compiled-in seed
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_ANALYZER_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!(
                "{ENV_ANALYZER_CONFIG_PATH} points to non-existent path"
            ));
        }
        let default_p = PathBuf::from(DEFAULT_ANALYZER_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default_seed())
    }

    fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if !(t.low < t.mild && t.mild < t.moderate && t.moderate < t.high) {
            return Err(anyhow!("risk thresholds must be strictly increasing"));
        }
        for (name, v) in [
            ("neg_sentiment", self.weights.neg_sentiment),
            ("keyword", self.weights.keyword),
            ("self_focus", self.weights.self_focus),
            ("speech_rate", self.weights.speech_rate),
            ("word_variety", self.weights.word_variety),
            ("pause", self.weights.pause),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(anyhow!("weight `{name}` must be a finite non-negative number"));
            }
        }
        Ok(())
    }

    pub fn keyword_set(&self) -> HashSet<String> {
        self.depression_keywords.iter().cloned().collect()
    }

    pub fn pronoun_set(&self) -> HashSet<String> {
        self.first_person_pronouns.iter().cloned().collect()
    }

    pub fn pause_marker_set(&self) -> HashSet<String> {
        self.pause_markers.iter().cloned().collect()
    }
}

/// Bind address for the HTTP server, from `HOST`/`PORT` env vars.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);
        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
