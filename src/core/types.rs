// File: src/core/types.rs
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A percentage similarity in `[0, 100]`.
///
/// The only way to build one is through `SimilarityScore::clamped` (or the
/// float helper in `core::blend`), so a value outside the range cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SimilarityScore(u8);

impl SimilarityScore {
    pub const MIN: SimilarityScore = SimilarityScore(0);
    pub const MAX: SimilarityScore = SimilarityScore(100);

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_perfect(self) -> bool {
        self == Self::MAX
    }
}

impl TryFrom<i64> for SimilarityScore {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(format!("similarity score {value} is outside 0..=100"))
        }
    }
}

impl From<SimilarityScore> for i64 {
    fn from(score: SimilarityScore) -> Self {
        i64::from(score.0)
    }
}

impl fmt::Display for SimilarityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of scoring one guess. Built per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResult {
    #[serde(rename = "correct")]
    pub is_correct: bool,
    pub score: SimilarityScore,
    /// The target phrase as originally supplied, before normalization.
    #[serde(rename = "correct_prompt")]
    pub revealed_target: String,
    /// Raw lexical score. Present only when the semantic signal was used.
    #[serde(rename = "levenshtein_score", default, skip_serializing_if = "Option::is_none")]
    pub lexical_component: Option<SimilarityScore>,
    /// Raw semantic score. Present only when the semantic signal was used.
    #[serde(rename = "llm_score", default, skip_serializing_if = "Option::is_none")]
    pub semantic_component: Option<SimilarityScore>,
}

/// A submitted leaderboard score. Recorded as given: integers stay integers,
/// reals stay reals, and neither is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Int(i64),
    Real(f64),
}

impl Score {
    pub fn as_f64(self) -> f64 {
        match self {
            Score::Int(v) => v as f64,
            Score::Real(v) => v,
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            Score::Int(_) => true,
            Score::Real(v) => v.is_finite(),
        }
    }

    /// Numeric comparison across both representations. Equal values compare
    /// equal regardless of form or sign, so `-0.0`, `0.0` and `0` tie.
    pub fn compare(self, other: Score) -> Ordering {
        match (self, other) {
            (Score::Int(a), Score::Int(b)) => a.cmp(&b),
            (a, b) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl From<i64> for Score {
    fn from(v: i64) -> Self {
        Score::Int(v)
    }
}

impl From<i32> for Score {
    fn from(v: i32) -> Self {
        Score::Int(i64::from(v))
    }
}

impl From<u32> for Score {
    fn from(v: u32) -> Self {
        Score::Int(i64::from(v))
    }
}

impl From<f64> for Score {
    fn from(v: f64) -> Self {
        Score::Real(v)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Int(v) => write!(f, "{v}"),
            Score::Real(v) => write!(f, "{v}"),
        }
    }
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: Score,
}

impl LeaderboardEntry {
    /// Builds a validated entry. The name is trimmed and must not be empty;
    /// the score must be a finite number.
    pub fn new(name: &str, score: impl Into<Score>) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let score = score.into();
        if !score.is_finite() {
            return Err(ValidationError::NonNumericScore);
        }
        Ok(Self {
            name: name.to_string(),
            score,
        })
    }

    /// Leaderboard ordering: score descending, then name ascending.
    pub fn rank_order(&self, other: &Self) -> Ordering {
        other
            .score
            .compare(self.score)
            .then_with(|| self.name.cmp(&other.name))
    }
}
