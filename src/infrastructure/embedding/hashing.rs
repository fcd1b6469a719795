//! Local feature-hashing embedder
//!
//! Projects lower-cased word tokens and character trigrams into a fixed
//! number of buckets with a signed hash, then L2-normalises the result.
//! Deterministic and offline; near-duplicate prompts land close together.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::DomainError;
use crate::domain::embedding::{Embedder, Embedding, ensure_not_empty};

pub const DEFAULT_HASHING_DIMENSIONS: usize = 768;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Result<Self, DomainError> {
        if dimensions == 0 {
            return Err(DomainError::configuration(
                "Embedding dimensions must be greater than zero",
            ));
        }

        Ok(Self { dimensions })
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let digest = Sha256::digest(feature.as_bytes());

        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimensions as u64) as usize;

        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }

    fn add_trigrams(&self, vector: &mut [f32], token: &str) {
        let chars: Vec<char> = format!("^{}$", token).chars().collect();

        for window in chars.windows(3) {
            let trigram: String = window.iter().collect();
            self.add_feature(vector, &format!("t:{}", trigram), TRIGRAM_WEIGHT);
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let lowered = text.to_lowercase();
        let mut has_words = false;

        for word in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            has_words = true;
            self.add_feature(&mut vector, &format!("w:{}", word), WORD_WEIGHT);
            self.add_trigrams(&mut vector, word);
        }

        // Punctuation or emoji only: hash the raw text so the vector is never zero
        if !has_words {
            let raw = lowered.trim();
            self.add_feature(&mut vector, &format!("r:{}", raw), WORD_WEIGHT);
            self.add_trigrams(&mut vector, raw);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }

        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_HASHING_DIMENSIONS,
        }
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        ensure_not_empty(text)?;
        Ok(Embedding::new(self.vectorize(text)))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        "feature-hashing"
    }
}
