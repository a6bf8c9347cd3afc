//! Match score — scrapes a percentage out of the model's free-text answer.
//!
//! The model is asked for an overall match percentage but nothing forces the
//! format, so parsing is best-effort: the first `N%` with N in 0..=100 wins
//! (decimals are rounded) and anything else falls back to a configured constant.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PERCENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s?%").expect("percentage pattern is valid"));

/// Qualitative band for a match percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Excellent,
    Good,
    NeedsWork,
    /// No percentage could be read from the answer.
    Unknown,
}

impl MatchTier {
    /// excellent ≥ 80, good ≥ 60, otherwise needs work
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage >= 80 {
            MatchTier::Excellent
        } else if percentage >= 60 {
            MatchTier::Good
        } else {
            MatchTier::NeedsWork
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchTier::Excellent => "Excellent",
            MatchTier::Good => "Good",
            MatchTier::NeedsWork => "Needs Work",
            MatchTier::Unknown => "Unknown",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            MatchTier::Excellent => "#00ff00",
            MatchTier::Good => "#ffff00",
            MatchTier::NeedsWork => "#ff6b6b",
            MatchTier::Unknown => "#cccccc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Parsed,
    Fallback,
}

/// Match percentage plus its presentation attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchScore {
    pub percentage: u8,
    pub tier: MatchTier,
    pub label: &'static str,
    pub color: &'static str,
    pub source: ScoreSource,
}

impl MatchScore {
    fn parsed(percentage: u8) -> Self {
        let tier = MatchTier::from_percentage(percentage);
        Self {
            percentage,
            tier,
            label: tier.label(),
            color: tier.color(),
            source: ScoreSource::Parsed,
        }
    }

    fn fallback(percentage: u8) -> Self {
        let tier = MatchTier::Unknown;
        Self {
            percentage: percentage.min(100),
            tier,
            label: tier.label(),
            color: tier.color(),
            source: ScoreSource::Fallback,
        }
    }
}

/// Returns the first in-range percentage found in `response`, or `fallback`
/// tagged as `Unknown` when there is none.
pub fn extract_match_percentage(response: &str, fallback: u8) -> MatchScore {
    PERCENT_PATTERN
        .captures_iter(response)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .find(|value| *value <= 100.0)
        .map(|value| MatchScore::parsed(value.round() as u8))
        .unwrap_or_else(|| MatchScore::fallback(fallback))
}
