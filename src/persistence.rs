// File: src/persistence.rs
use crate::core::types::LeaderboardEntry;
use crate::error::StoreError;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Encodes the leaderboard as a pretty-printed JSON array of
/// `{"name": ..., "score": ...}` records with four-space indentation.
pub fn encode(entries: &[LeaderboardEntry]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries.serialize(&mut ser)?;
    Ok(buf)
}

/// Writes `entries` to `path` atomically.
///
/// The data goes to a temporary file in the same directory, is synced, and
/// then renamed over `path`, so a reader sees either the old file or the new
/// one and never a partial write.
pub fn save_to_disk(entries: &[LeaderboardEntry], path: &Path) -> Result<(), StoreError> {
    let bytes = encode(entries)?;
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(write_err)?;

    let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(write_err)?;
    temp_file.write_all(&bytes).map_err(write_err)?;
    temp_file.as_file().sync_all().map_err(write_err)?;

    temp_file.persist(path).map_err(|e| write_err(e.error))?;
    sync_dir(parent_dir).map_err(write_err)?;
    Ok(())
}

/// Flushes the directory entry so the rename itself survives a power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Reads the leaderboard at `path`.
///
/// `Ok(None)` means there is no file yet. Content that is not a JSON array of
/// records comes back as an `InvalidData` error.
pub fn load_from_disk(path: &Path) -> std::io::Result<Option<Vec<LeaderboardEntry>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let reader = BufReader::new(file);
    let entries: Vec<LeaderboardEntry> = serde_json::from_reader(reader)?;
    Ok(Some(entries))
}
