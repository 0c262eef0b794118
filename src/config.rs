// File: src/config.rs
//! Process configuration, read once at startup and injected into the engine
//! and the store.
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional TOML
//! file (`~/.config/genie/config.toml` by default), environment variables.
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL_IDENTIFIER: &str = "paraphrase-multilingual-MiniLM-L12-v2";
pub const LEADERBOARD_FILE_NAME: &str = "leaderboard.json";

pub const ENV_ENABLE_SEMANTIC: &str = "ENABLE_LLM_SCORING";
pub const ENV_MODEL_NAME: &str = "LLM_MODEL_NAME";
pub const ENV_LEADERBOARD_PATH: &str = "GENIE_LEADERBOARD_PATH";

/// Knobs for the guess scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub semantic_scoring_enabled: bool,
    pub model_identifier: String,
    /// Upper bound on one semantic attempt. `None` waits for the model.
    pub semantic_timeout_ms: Option<u64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            semantic_scoring_enabled: false,
            model_identifier: DEFAULT_MODEL_IDENTIFIER.to_string(),
            semantic_timeout_ms: None,
        }
    }
}

impl ScoringConfig {
    pub fn semantic_timeout(&self) -> Option<Duration> {
        self.semantic_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenieConfig {
    pub scoring: ScoringConfig,
    pub leaderboard_path: PathBuf,
}

impl Default for GenieConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            leaderboard_path: default_leaderboard_path(),
        }
    }
}

impl GenieConfig {
    /// Loads the file at `path` (or the default location) and applies
    /// environment overrides from the current process.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => load_config(p)?,
            None => match config_path() {
                Some(p) => load_config(&p)?,
                None => GenieConfig::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overrides fields from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = lookup(ENV_ENABLE_SEMANTIC) {
            self.scoring.semantic_scoring_enabled = parse_flag(&flag);
        }
        if let Some(name) = lookup(ENV_MODEL_NAME).filter(|n| !n.trim().is_empty()) {
            self.scoring.model_identifier = name.trim().to_string();
        }
        if let Some(path) = lookup(ENV_LEADERBOARD_PATH).filter(|p| !p.trim().is_empty()) {
            self.leaderboard_path = PathBuf::from(path.trim());
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// `<data dir>/genie/leaderboard.json`, or `./leaderboard.json` when the
/// platform has no data directory.
pub fn default_leaderboard_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("genie").join(LEADERBOARD_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LEADERBOARD_FILE_NAME))
}

/// Default config location: `<config dir>/genie/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("genie").join("config.toml"))
}

/// Load config from a file path. Returns defaults if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<GenieConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(GenieConfig::default()),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_disable_semantic_scoring() {
        let config = GenieConfig::default();
        assert!(!config.scoring.semantic_scoring_enabled);
        assert_eq!(config.scoring.model_identifier, DEFAULT_MODEL_IDENTIFIER);
        assert_eq!(config.scoring.semantic_timeout(), None);
        assert!(config.leaderboard_path.ends_with(LEADERBOARD_FILE_NAME));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = GenieConfig::default();
        config.apply_env(env(&[
            (ENV_ENABLE_SEMANTIC, "True"),
            (ENV_MODEL_NAME, "test-custom-model-xyz"),
            (ENV_LEADERBOARD_PATH, "/tmp/board.json"),
        ]));
        assert!(config.scoring.semantic_scoring_enabled);
        assert_eq!(config.scoring.model_identifier, "test-custom-model-xyz");
        assert_eq!(config.leaderboard_path, PathBuf::from("/tmp/board.json"));
    }

    #[test]
    fn unrecognised_flag_values_disable() {
        let mut config = GenieConfig::default();
        config.scoring.semantic_scoring_enabled = true;
        config.apply_env(env(&[(ENV_ENABLE_SEMANTIC, "nope")]));
        assert!(!config.scoring.semantic_scoring_enabled);
    }

    #[test]
    fn blank_model_name_is_ignored() {
        let mut config = GenieConfig::default();
        config.apply_env(env(&[(ENV_MODEL_NAME, "  ")]));
        assert_eq!(config.scoring.model_identifier, DEFAULT_MODEL_IDENTIFIER);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GenieConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "leaderboard_path = \"board.json\"\n\n[scoring]\nsemantic_scoring_enabled = true\nsemantic_timeout_ms = 250\n",
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert!(config.scoring.semantic_scoring_enabled);
        assert_eq!(config.scoring.model_identifier, DEFAULT_MODEL_IDENTIFIER);
        assert_eq!(config.scoring.semantic_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.leaderboard_path, PathBuf::from("board.json"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scoring = [not toml").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }
}
