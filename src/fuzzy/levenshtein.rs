// File: src/fuzzy/levenshtein.rs
use crate::core::blend::round_percent;
use crate::core::types::SimilarityScore;
use strsim::levenshtein;

/// Edit-distance similarity between two already-normalized strings.
///
/// An empty guess against a non-empty target is always 0. Two empty strings
/// score 100. Otherwise the score is `(1 - d / max_len) * 100` rounded half to
/// even, where `d` is the Levenshtein distance and `max_len` counts characters
/// of the longer input.
pub fn lexical_score(guess: &str, target: &str) -> SimilarityScore {
    if guess.is_empty() && !target.is_empty() {
        return SimilarityScore::MIN;
    }

    let max_len = guess.chars().count().max(target.chars().count());
    if max_len == 0 {
        return SimilarityScore::MAX;
    }

    let distance = levenshtein(guess, target);
    round_percent((1.0 - distance as f64 / max_len as f64) * 100.0)
}
