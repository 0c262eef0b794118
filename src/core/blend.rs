// File: src/core/blend.rs
use crate::core::types::SimilarityScore;

/// Rounds a scaled percentage half to even and clamps it into `[0, 100]`.
/// Non-finite input collapses to 0.
pub fn round_percent(value: f64) -> SimilarityScore {
    if !value.is_finite() {
        return SimilarityScore::MIN;
    }
    SimilarityScore::clamped(value.round_ties_even() as i64)
}

/// Combines the lexical score with the optional semantic score.
///
/// Without a semantic score the lexical score passes through unchanged.
/// With one, the result is their mean rounded half to even, so it always
/// lies between the two inputs.
pub fn blend(lexical: SimilarityScore, semantic: Option<SimilarityScore>) -> SimilarityScore {
    match semantic {
        None => lexical,
        Some(semantic) => {
            let sum = f64::from(lexical.value()) + f64::from(semantic.value());
            round_percent(sum / 2.0)
        }
    }
}
