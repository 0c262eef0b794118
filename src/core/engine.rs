// File: src/core/engine.rs
use crate::config::ScoringConfig;
use crate::core::blend::blend;
use crate::core::normalize::normalize;
use crate::core::types::{GuessResult, SimilarityScore};
use crate::fuzzy::lexical_score;
use crate::semantic::{ModelHandle, SemanticScorer};
use tracing::{debug, warn};

// The guess scorer is composed of the lexical scorer and, when enabled and a
// model is present, the semantic scorer. It holds no mutable state and can be
// shared across request threads behind an `Arc` or a plain reference.
pub struct GuessEngine {
    semantic: Option<SemanticScorer>,
}

impl GuessEngine {
    pub fn new(config: &ScoringConfig, model: ModelHandle) -> Self {
        let semantic = match model {
            ModelHandle::Available(model) if config.semantic_scoring_enabled => {
                Some(SemanticScorer::new(model, config.semantic_timeout()))
            }
            _ => None,
        };
        Self { semantic }
    }

    pub fn lexical_only() -> Self {
        Self { semantic: None }
    }

    pub fn semantic_enabled(&self) -> bool {
        self.semantic.is_some()
    }

    /// Scores `raw_guess` against an already-resolved `target_phrase`.
    ///
    /// Never fails: a semantic signal that errors, panics or times out is
    /// dropped and the lexical score is reported alone.
    pub fn evaluate_guess(&self, target_phrase: &str, raw_guess: &str) -> GuessResult {
        let guess = normalize(raw_guess);
        let target = normalize(target_phrase);

        // An empty guess is never correct and never scores above 0.
        if guess.is_empty() {
            return Self::result(target_phrase, SimilarityScore::MIN, None);
        }

        let lexical = lexical_score(&guess, &target);

        let semantic = self.semantic.as_ref().and_then(|scorer| match scorer.score(&guess, &target) {
            Ok(score) => Some(score),
            Err(e) => {
                warn!(error = %e, "Semantic scoring failed; falling back to lexical score");
                None
            }
        });

        let score = blend(lexical, semantic);
        debug!(%lexical, semantic = ?semantic.map(SimilarityScore::value), %score, "Scored guess");

        Self::result(target_phrase, score, semantic.map(|s| (lexical, s)))
    }

    fn result(
        target_phrase: &str,
        score: SimilarityScore,
        components: Option<(SimilarityScore, SimilarityScore)>,
    ) -> GuessResult {
        GuessResult {
            is_correct: score.is_perfect(),
            score,
            revealed_target: target_phrase.to_string(),
            lexical_component: components.map(|(lexical, _)| lexical),
            semantic_component: components.map(|(_, semantic)| semantic),
        }
    }
}

impl Default for GuessEngine {
    fn default() -> Self {
        Self::lexical_only()
    }
}
