//! Integration tests for the file-backed leaderboard.
//!
//! Each test gets its own temp directory so the backing files never collide.

use genie_core::request::parse_score_submission;
use genie_core::{LeaderboardEntry, LeaderboardStore, Score, StoreError, ValidationError, LEADERBOARD_MAX_SIZE};
use serde_json::json;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn new_store() -> (TempDir, LeaderboardStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = LeaderboardStore::open(dir.path().join("leaderboard.json"));
    (dir, store)
}

fn read_file(store: &LeaderboardStore) -> serde_json::Value {
    let raw = std::fs::read_to_string(store.path()).expect("leaderboard file should exist");
    serde_json::from_str(&raw).expect("leaderboard file should be valid JSON")
}

fn assert_ranked(entries: &[LeaderboardEntry]) {
    for pair in entries.windows(2) {
        assert_ne!(
            pair[0].rank_order(&pair[1]),
            std::cmp::Ordering::Greater,
            "{:?} ranked above {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn reading_without_backing_file_is_empty() {
    let (_dir, store) = new_store();
    assert_eq!(store.top_entries(), Vec::<LeaderboardEntry>::new());
}

#[test]
fn submit_persists_single_entry() {
    let (_dir, store) = new_store();
    store.submit("Player1", 100).unwrap();
    assert_eq!(read_file(&store), json!([{ "name": "Player1", "score": 100 }]));
}

#[test]
fn keeps_only_top_ten_of_twelve() {
    let (_dir, store) = new_store();
    for i in 0..12 {
        store.submit(&format!("Player{}", i + 1), (i + 1) * 10).unwrap();
    }

    let board = store.top_entries();
    assert_eq!(board.len(), 10);
    assert_eq!(board[0].name, "Player12");
    assert_eq!(board[0].score, Score::Int(120));
    assert_eq!(board[9].name, "Player3");
    assert_eq!(board[9].score, Score::Int(30));

    let on_disk = read_file(&store);
    assert_eq!(on_disk.as_array().unwrap().len(), 10);
}

#[test]
fn ties_break_by_name_ascending() {
    let (_dir, store) = new_store();
    for i in 0..12 {
        store.submit(&format!("Player{}", i + 1), (i + 1) * 10).unwrap();
    }
    store.submit("Beta", 120).unwrap();
    store.submit("Alpha", 120).unwrap();

    let board = store.top_entries();
    assert_eq!(board.len(), 10);
    let top: Vec<&str> = board.iter().take(3).map(|e| e.name.as_str()).collect();
    assert_eq!(top, ["Alpha", "Beta", "Player12"]);
    assert_eq!(board.last().unwrap().score, Score::Int(50));

    let on_disk = read_file(&store);
    assert_eq!(on_disk[0]["name"], "Alpha");
    assert_eq!(on_disk[1]["name"], "Beta");
}

#[test]
fn populated_board_reads_in_score_order() {
    let (_dir, store) = new_store();
    store.submit("PlayerA", 150).unwrap();
    store.submit("PlayerB", 200).unwrap();
    store.submit("PlayerC", 100).unwrap();

    let board = store.top_entries();
    let rows: Vec<(&str, Score)> = board.iter().map(|e| (e.name.as_str(), e.score)).collect();
    assert_eq!(
        rows,
        [("PlayerB", Score::Int(200)), ("PlayerA", Score::Int(150)), ("PlayerC", Score::Int(100))]
    );
}

#[test]
fn dominated_entry_is_accepted_but_not_visible() {
    let (_dir, store) = new_store();
    for i in 0..LEADERBOARD_MAX_SIZE {
        store.submit(&format!("Top{i}"), 1000).unwrap();
    }
    store.submit("Latecomer", 1).unwrap();
    let board = store.top_entries();
    assert_eq!(board.len(), LEADERBOARD_MAX_SIZE);
    assert!(board.iter().all(|e| e.name != "Latecomer"));
}

#[test]
fn never_exceeds_capacity_and_stays_sorted() {
    let (_dir, store) = new_store();
    // Scores jump around so inserts land at the top, middle and bottom.
    for i in 0..40i64 {
        let score = (i * 37) % 23;
        store.submit(&format!("p{}", i % 7), score).unwrap();
        let board = store.top_entries();
        assert!(board.len() <= LEADERBOARD_MAX_SIZE);
        assert_ranked(&board);
    }
}

#[test]
fn request_body_validation_feeds_store() {
    let (_dir, store) = new_store();

    let err = parse_score_submission(&json!({"name": "Player1", "score": "not_a_number"})).unwrap_err();
    assert_eq!(err, ValidationError::NonNumericScore);
    assert_eq!(err.to_string(), "Score must be a number");

    let err = parse_score_submission(&json!({"name": "  ", "score": 100})).unwrap_err();
    assert_eq!(err.to_string(), "Name cannot be empty");

    let entry = parse_score_submission(&json!({"name": "Player1", "score": 87.5})).unwrap();
    store.submit_entry(entry).unwrap();
    assert_eq!(read_file(&store), json!([{ "name": "Player1", "score": 87.5 }]));
}

#[test]
fn negative_zero_ties_with_zero_and_breaks_by_name() {
    let (_dir, store) = new_store();
    let beta = parse_score_submission(&json!({"name": "Beta", "score": 0})).unwrap();
    let alpha = parse_score_submission(&json!({"name": "Alpha", "score": -0.0})).unwrap();
    store.submit_entry(beta).unwrap();
    store.submit_entry(alpha).unwrap();

    let names: Vec<String> = store.top_entries().into_iter().map(|e| e.name).collect();
    assert_eq!(names, ["Alpha", "Beta"]);
}

#[test]
fn corrupt_file_is_treated_as_empty() {
    let (_dir, store) = new_store();
    std::fs::write(store.path(), "[{\"name\": \"half").unwrap();
    assert!(store.top_entries().is_empty());

    store.submit("Survivor", 10).unwrap();
    assert_eq!(store.top_entries(), vec![LeaderboardEntry::new("Survivor", 10).unwrap()]);
}

#[test]
fn write_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let store = LeaderboardStore::open(blocker.join("leaderboard.json"));

    let err = store.submit("Player1", 100).unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }), "{err:?}");
    assert!(store.top_entries().is_empty());
}

#[test]
fn concurrent_submissions_lose_nothing() {
    let (_dir, store) = new_store();
    let store = Arc::new(store);
    let threads = 8;
    let per_thread = 20;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut mine = Vec::new();
                for i in 0..per_thread {
                    let entry = LeaderboardEntry::new(&format!("t{t}-{i:02}"), (t * per_thread + i) as i64).unwrap();
                    store.submit_entry(entry.clone()).unwrap();
                    mine.push(entry);
                }
                mine
            })
        })
        .collect();

    let mut all: Vec<LeaderboardEntry> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    genie_core::leaderboard::rank(&mut all);

    assert_eq!(store.top_entries(), all);
}

#[test]
fn readers_never_see_partial_files() {
    let (_dir, store) = new_store();
    let store = Arc::new(store);

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..200i64 {
                store.submit(&format!("w{i:03}"), i).unwrap();
            }
        })
    };

    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let mut last_len = 0;
            for _ in 0..500 {
                let board = store.top_entries();
                // An interrupted write would read as empty after the board filled up.
                assert!(board.len() >= last_len, "board shrank from {last_len} to {}", board.len());
                last_len = board.len();
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(store.top_entries().len(), LEADERBOARD_MAX_SIZE);
}
