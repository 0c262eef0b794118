// File: src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod fuzzy;
pub mod leaderboard;
pub mod persistence;
pub mod request;
pub mod semantic;

pub use crate::config::{GenieConfig, ScoringConfig};
pub use crate::core::engine::GuessEngine;
pub use crate::core::types::{GuessResult, LeaderboardEntry, Score, SimilarityScore};
pub use crate::error::{ConfigError, EmbeddingError, StoreError, ValidationError};
pub use crate::leaderboard::{LeaderboardStore, LEADERBOARD_MAX_SIZE};
pub use crate::semantic::{EmbeddingModel, HashingEmbedder, ModelHandle};
