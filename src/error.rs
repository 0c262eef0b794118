// File: src/error.rs
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Malformed caller input. Raised before any side effect takes place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field has the wrong type: {0}")]
    InvalidField(&'static str),

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Score must be a number")]
    NonNumericScore,
}

/// Errors surfaced by `LeaderboardStore::submit`.
///
/// An unreadable or corrupt backing file is not an error: it loads as an
/// empty leaderboard. Only validation and durable-write failures reach the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to write leaderboard to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why the semantic signal could not be produced for a request.
/// Never reaches the caller of `evaluate_guess`; it only gets logged.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding model is unavailable")]
    Unavailable,

    #[error("Embedding inference failed: {0}")]
    Inference(String),

    #[error("Embedding dimensions differ: {left} vs {right}")]
    Dimension { left: usize, right: usize },

    #[error("Similarity is not a finite number")]
    NotFinite,

    #[error("Embedding did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Embedding model panicked")]
    Panicked,

    #[error("Failed to start embedding worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("All {0} embedding workers are busy")]
    Busy(usize),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
