// File: src/bin/main.rs
use anyhow::{bail, Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use genie_core::{
    EmbeddingError, EmbeddingModel, GenieConfig, GuessEngine, GuessResult, HashingEmbedder,
    LeaderboardStore, ModelHandle, StoreError,
};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_PHRASES: [&str; 2] = ["A cat wearing a tiny hat", "A dog riding a skateboard"];

struct Args {
    config: Option<PathBuf>,
    phrases: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { config: None, phrases: None };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("Usage: genie [--config PATH] [PHRASES_FILE]");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("Unknown option: {other}"),
            other => args.phrases = Some(PathBuf::from(other)),
        }
    }
    Ok(args)
}

/// Only the built-in hashing model ships with the game.
fn load_model(identifier: &str) -> Result<Arc<dyn EmbeddingModel>, EmbeddingError> {
    if identifier == HashingEmbedder::IDENTIFIER {
        Ok(Arc::new(HashingEmbedder::default()))
    } else {
        Err(EmbeddingError::Unavailable)
    }
}

fn load_phrases(path: Option<&PathBuf>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(DEFAULT_PHRASES.iter().map(|s| s.to_string()).collect());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read phrases from {}", path.display()))?;
    let phrases: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if phrases.is_empty() {
        bail!("No phrases found in {}", path.display());
    }
    Ok(phrases)
}

fn read_line() -> Result<String> {
    let mut input = String::new();
    stdin().read_line(&mut input).context("Failed to read from stdin")?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = parse_args()?;
    let config = GenieConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let model = ModelHandle::from_config(&config.scoring, load_model);
    let engine = GuessEngine::new(&config.scoring, model);
    let store = LeaderboardStore::open(&config.leaderboard_path);
    let phrases = load_phrases(args.phrases.as_ref())?;

    let mut total: i64 = 0;
    let mut played = 0usize;

    for (round, phrase) in phrases.iter().enumerate() {
        print_round(round + 1, phrases.len(), total, engine.semantic_enabled())?;
        let guess = read_line()?;
        if guess.trim() == "exit" {
            break;
        }
        let result = engine.evaluate_guess(phrase, &guess);
        total += i64::from(result.score.value());
        played += 1;
        print_result(&result);
        println!("\nPress [Enter] for the next round.");
        read_line()?;
    }

    if played > 0 {
        println!("\nFinal score: {}", total.to_string().bold());
        print!("Enter your name for the leaderboard (blank to skip): ");
        stdout().flush()?;
        let name = read_line()?;
        if !name.trim().is_empty() {
            match store.submit(&name, total) {
                Ok(()) => println!("{}", "Score submitted successfully".green()),
                Err(StoreError::Validation(e)) => println!("{}", e.to_string().red()),
                Err(e) => return Err(e).context("Could not save your score"),
            }
        }
    }

    print_leaderboard(&store);
    Ok(())
}

fn print_round(round: usize, rounds: usize, total: i64, semantic: bool) -> Result<()> {
    execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", "Guess the Prompt!".bold());
    println!("---------------------------------------------------------------");
    println!(
        "Round {round}/{rounds}   Total: {total}   Semantic scoring: {}",
        if semantic { "on" } else { "off" }
    );
    println!("Type your guess and press [Enter]. 'exit' to stop early.\n");
    print!("> ");
    stdout().flush()?;
    Ok(())
}

fn print_result(result: &GuessResult) {
    let score = format!("{}/100", result.score);
    if result.is_correct {
        println!("\n{} {}", "Correct!".green().bold(), score);
    } else {
        println!("\n{} {}", "Not quite.".yellow(), score);
    }
    if let (Some(lexical), Some(semantic)) = (result.lexical_component, result.semantic_component) {
        println!("  lexical: {lexical}  semantic: {semantic}");
    }
    println!("The prompt was: '{}'", result.revealed_target);
}

fn print_leaderboard(store: &LeaderboardStore) {
    let entries = store.top_entries();
    println!("\n{}", "Leaderboard".bold());
    if entries.is_empty() {
        println!("  No scores yet.");
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        println!("  {:>2}. {:<20} {}", i + 1, entry.name, entry.score);
    }
}
