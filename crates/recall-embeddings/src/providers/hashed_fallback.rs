//! Hashed bag-of-words fallback provider.
//!
//! Generates fixed-dimension vectors by hashing lowercase words into
//! buckets and spreading each hit over a small neighbourhood. No external
//! dependencies, works in air-gapped environments, and identical text
//! always yields bit-identical vectors.

use async_trait::async_trait;
use recall_core::constants::FALLBACK_NEIGHBOURHOOD;
use recall_core::errors::ProviderError;
use recall_core::traits::{EmbedMode, IEmbeddingProvider};

use crate::similarity::l2_normalize;

/// Deterministic offline embedding provider.
#[derive(Debug, Clone)]
pub struct HashedFallback {
    dimensions: usize,
}

impl HashedFallback {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Hash a word with FNV-1a. Stable across runs, processes and platforms.
    fn hash_word(word: &str) -> u64 {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in word.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        h
    }

    /// Embed `text` synchronously.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let dims = self.dimensions;
        let mut vec = vec![0.0f32; dims];

        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            let base = (Self::hash_word(&word) % dims as u64) as usize;
            // The base bucket gets weight 1, then 1/2, 1/3, 1/4 for the neighbours.
            for offset in 0..=FALLBACK_NEIGHBOURHOOD {
                vec[(base + offset) % dims] += 1.0 / (offset as f32 + 1.0);
            }
        }

        l2_normalize(&mut vec);
        vec
    }
}

#[async_trait]
impl IEmbeddingProvider for HashedFallback {
    async fn embed_many(
        &self,
        texts: &[String],
        _mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hash-fallback"
    }
}
