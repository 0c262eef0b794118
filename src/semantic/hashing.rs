// File: src/semantic/hashing.rs
use super::EmbeddingModel;
use crate::error::EmbeddingError;

pub const DEFAULT_DIMENSION: usize = 256;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// An offline, deterministic embedding: character trigrams of the padded text
/// are hashed (FNV-1a) into a fixed number of signed buckets and the result
/// is L2-normalized.
///
/// It measures shared surface fragments rather than meaning, but it needs no
/// model download and gives the game a working semantic signal out of the box.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub const IDENTIFIER: &'static str = "hashing-trigram";

    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

impl EmbeddingModel for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; self.dimension];

        let padded: Vec<char> = format!("  {text} ").chars().collect();
        let mut buf = [0u8; 12];
        for window in padded.windows(3) {
            let mut len = 0;
            for c in window {
                len += c.encode_utf8(&mut buf[len..]).len();
            }
            let hash = fnv1a(&buf[..len]);
            let bucket = (hash % self.dimension as u64) as usize;
            // Top bit picks the sign so unrelated trigrams tend to cancel.
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}
