// File: src/fuzzy/mod.rs
pub mod levenshtein;

pub use levenshtein::lexical_score;
