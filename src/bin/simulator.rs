// File: src/bin/simulator.rs
// Hammers one leaderboard file from many threads and checks that no
// submission was lost: the final board must equal the top entries of
// everything that was submitted.
//
// Usage: leaderboard_sim [THREADS] [PER_THREAD] [PATH]
use anyhow::{bail, Context, Result};
use genie_core::leaderboard::rank;
use genie_core::{LeaderboardEntry, LeaderboardStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn arg<T: std::str::FromStr>(args: &[String], idx: usize, default: T) -> Result<T> {
    match args.get(idx) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid argument '{raw}'")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let threads: usize = arg(&args, 0, 8)?;
    let per_thread: usize = arg(&args, 1, 25)?;

    // Keep the temp dir alive for the whole run when no path is given.
    let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
    let path = match args.get(2) {
        Some(p) => PathBuf::from(p),
        None => temp_dir.path().join("leaderboard.json"),
    };

    let store = Arc::new(LeaderboardStore::open(&path));
    let mut expected = store.top_entries();
    let started = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || -> Result<Vec<LeaderboardEntry>> {
                let mut submitted = Vec::with_capacity(per_thread);
                for i in 0..per_thread {
                    let score = ((t * 7919 + i * 104_729) % 1000) as i64;
                    let entry = LeaderboardEntry::new(&format!("t{t:02}-{i:04}"), score)?;
                    store.submit_entry(entry.clone())?;
                    submitted.push(entry);
                }
                Ok(submitted)
            })
        })
        .collect();

    for handle in handles {
        let submitted = match handle.join() {
            Ok(result) => result?,
            Err(_) => bail!("Submitter thread panicked"),
        };
        expected.extend(submitted);
    }
    rank(&mut expected);

    let actual = store.top_entries();
    info!(elapsed = ?started.elapsed(), submissions = threads * per_thread, "Simulation finished");

    println!("Submitted {} scores from {} threads to {}", threads * per_thread, threads, path.display());
    for (i, entry) in actual.iter().enumerate() {
        println!("  {:>2}. {:<12} {}", i + 1, entry.name, entry.score);
    }

    if actual != expected {
        bail!("Lost update detected: board does not match the expected top entries");
    }
    println!("OK: no lost updates");
    Ok(())
}
