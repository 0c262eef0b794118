// File: src/semantic/mod.rs
//! Optional embedding-based similarity signal.
//!
//! The model is owned by the surrounding process and handed to the engine as a
//! `ModelHandle`. Everything here treats the model as untrusted: an error, a
//! panic or a slow answer only removes the semantic signal for that request.

pub mod hashing;

pub use hashing::HashingEmbedder;

use crate::config::ScoringConfig;
use crate::core::blend::round_percent;
use crate::core::types::SimilarityScore;
use crate::error::EmbeddingError;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Capability the scorer needs from an embedding model.
///
/// Implementations must be safe to share across request threads.
pub trait EmbeddingModel: Send + Sync {
    /// Fixed-dimensional vector for `text`.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Cosine similarity between two vectors produced by `embed`.
    fn cosine_similarity(&self, a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
        cosine_similarity(a, b)
    }
}

fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f32]) -> f32 {
    dot_product(v, v).sqrt()
}

/// Cosine similarity in `[-1, 1]`. A zero vector on either side yields 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::Dimension {
            left: a.len(),
            right: b.len(),
        });
    }

    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product(a, b) / (norm_a * norm_b))
}

/// Whether a usable model exists for this process.
#[derive(Clone, Default)]
pub enum ModelHandle {
    Available(Arc<dyn EmbeddingModel>),
    #[default]
    Unavailable,
}

impl ModelHandle {
    pub fn available(model: impl EmbeddingModel + 'static) -> Self {
        ModelHandle::Available(Arc::new(model))
    }

    /// Resolves the handle from configuration. The loader is only called when
    /// semantic scoring is enabled; a loader failure leaves the model unavailable.
    pub fn from_config<F>(config: &ScoringConfig, loader: F) -> Self
    where
        F: FnOnce(&str) -> Result<Arc<dyn EmbeddingModel>, EmbeddingError>,
    {
        if !config.semantic_scoring_enabled {
            return ModelHandle::Unavailable;
        }
        match loader(&config.model_identifier) {
            Ok(model) => ModelHandle::Available(model),
            Err(e) => {
                warn!(model = %config.model_identifier, error = %e, "Embedding model failed to load; semantic scoring disabled");
                ModelHandle::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ModelHandle::Available(_))
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelHandle::Available(_) => f.write_str("ModelHandle::Available(..)"),
            ModelHandle::Unavailable => f.write_str("ModelHandle::Unavailable"),
        }
    }
}

/// Most semantic workers that may be running at once. A model that hangs past
/// the timeout keeps its worker alive; once this many are stuck, further
/// requests skip the semantic signal instead of spawning more threads.
pub const MAX_SEMANTIC_WORKERS: usize = 4;

type Job = Box<dyn FnOnce() + Send + 'static>;

fn spawn_named(job: Job) -> std::io::Result<()> {
    thread::Builder::new()
        .name("semantic-score".into())
        .spawn(job)
        .map(|_| ())
}

/// Reservation of one worker slot, released on drop.
struct WorkerSlot(Arc<AtomicUsize>);

impl WorkerSlot {
    fn acquire(counter: &Arc<AtomicUsize>) -> Option<Self> {
        counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < MAX_SEMANTIC_WORKERS).then_some(n + 1)
            })
            .ok()
            .map(|_| WorkerSlot(Arc::clone(counter)))
    }
}

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Embedding-cosine percentage score, made in a single attempt per request.
pub struct SemanticScorer {
    model: Arc<dyn EmbeddingModel>,
    timeout: Option<Duration>,
    workers: Arc<AtomicUsize>,
}

impl SemanticScorer {
    pub fn new(model: Arc<dyn EmbeddingModel>, timeout: Option<Duration>) -> Self {
        Self {
            model,
            timeout,
            workers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Embeds both strings, takes their cosine similarity, clamps it to
    /// `[0, 1]` and scales it to a percentage rounded half to even.
    pub fn score(&self, guess: &str, target: &str) -> Result<SimilarityScore, EmbeddingError> {
        let similarity = match self.timeout {
            None => similarity_once(self.model.as_ref(), guess, target)?,
            Some(limit) => self.similarity_bounded(spawn_named, guess, target, limit)?,
        };

        if !similarity.is_finite() {
            return Err(EmbeddingError::NotFinite);
        }
        let clamped = f64::from(similarity).clamp(0.0, 1.0);
        Ok(round_percent(clamped * 100.0))
    }

    /// Runs the model on a worker thread and waits at most `limit`. A late
    /// answer is dropped along with the worker's channel.
    fn similarity_bounded<S>(
        &self,
        spawn: S,
        guess: &str,
        target: &str,
        limit: Duration,
    ) -> Result<f32, EmbeddingError>
    where
        S: FnOnce(Job) -> std::io::Result<()>,
    {
        let slot = WorkerSlot::acquire(&self.workers).ok_or(EmbeddingError::Busy(MAX_SEMANTIC_WORKERS))?;
        let (tx, rx) = mpsc::channel();
        let model = Arc::clone(&self.model);
        let guess = guess.to_string();
        let target = target.to_string();

        // On spawn failure the job, and with it the slot, is dropped here.
        spawn(Box::new(move || {
            let _slot = slot;
            let _ = tx.send(similarity_once(model.as_ref(), &guess, &target));
        }))
        .map_err(EmbeddingError::Spawn)?;

        match rx.recv_timeout(limit) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(EmbeddingError::Timeout(limit)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EmbeddingError::Panicked),
        }
    }

    #[cfg(test)]
    fn busy_workers(&self) -> usize {
        self.workers.load(Ordering::Acquire)
    }
}

fn similarity_once(model: &dyn EmbeddingModel, guess: &str, target: &str) -> Result<f32, EmbeddingError> {
    catch_unwind(AssertUnwindSafe(|| {
        let guess_vec = model.embed(guess)?;
        let target_vec = model.embed(target)?;
        model.cosine_similarity(&guess_vec, &target_vec)
    }))
    .unwrap_or(Err(EmbeddingError::Panicked))
}
