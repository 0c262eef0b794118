// File: src/leaderboard.rs
use crate::core::types::{LeaderboardEntry, Score};
use crate::error::StoreError;
use crate::persistence::{load_from_disk, save_to_disk};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Number of entries the leaderboard keeps.
pub const LEADERBOARD_MAX_SIZE: usize = 10;

/// Sorts by score descending then name ascending, and drops everything past
/// `LEADERBOARD_MAX_SIZE`.
pub fn rank(entries: &mut Vec<LeaderboardEntry>) {
    entries.sort_by(|a, b| a.rank_order(b));
    entries.truncate(LEADERBOARD_MAX_SIZE);
}

/// File-backed top-K leaderboard.
///
/// The file is the source of truth: every call reloads it. Submissions hold
/// `write_lock` across the whole load, insert, rank and save cycle so two
/// writers can never both start from the same state. Readers take no lock;
/// the atomic rename in `save_to_disk` means they only ever see complete files.
///
/// Open one store per file and share it (by reference or `Arc`) between
/// threads; separate stores on the same path do not coordinate.
#[derive(Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LeaderboardStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!(path = %path.display(), "Opened leaderboard");
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates and records a score. See `submit_entry`.
    pub fn submit(&self, name: &str, score: impl Into<Score>) -> Result<(), StoreError> {
        let entry = LeaderboardEntry::new(name, score)?;
        self.submit_entry(entry)
    }

    /// Records `entry`, keeping only the best `LEADERBOARD_MAX_SIZE` entries.
    ///
    /// The entry may be accepted and still not appear on the board when ten
    /// others already outrank it. Returns an error only for invalid input or
    /// when the new board could not be written durably.
    pub fn submit_entry(&self, entry: LeaderboardEntry) -> Result<(), StoreError> {
        let entry = LeaderboardEntry::new(&entry.name, entry.score)?;

        // The guarded state lives on disk, so a panic in another holder
        // leaves nothing half-updated in memory.
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entries = self.load();
        info!(name = %entry.name, score = %entry.score, "Recording leaderboard score");
        entries.push(entry);
        rank(&mut entries);
        save_to_disk(&entries, &self.path)
    }

    /// The current board, best first, at most `LEADERBOARD_MAX_SIZE` long.
    pub fn top_entries(&self) -> Vec<LeaderboardEntry> {
        let mut entries = self.load();
        // The file should already be ranked; re-rank in case it was edited by hand.
        rank(&mut entries);
        entries
    }

    fn load(&self) -> Vec<LeaderboardEntry> {
        match load_from_disk(&self.path) {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Leaderboard unreadable; treating as empty");
                Vec::new()
            }
        }
    }
}
