use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::RetrievalError;
use crate::models::Metadata;

/// Per-call retrieval configuration.
///
/// Passed explicitly through the call chain and never mutated by the
/// pipeline. The `[retrieval]` config section supplies the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Nearest neighbours requested from the store.
    pub top_k: usize,
    /// Candidates scoring below this (after clamping to [0,1]) are dropped.
    pub similarity_threshold: f32,
    /// Re-rank the candidate set before assembly.
    pub use_reranking: bool,
    /// Use multi-query (hybrid) search instead of a single similarity search.
    pub hybrid: bool,
    /// Maximum candidates placed into the assembled context.
    pub max_chunks: usize,
    /// Token budget of the assembled context.
    pub max_tokens: usize,
    /// Metadata equality filter forwarded to the store.
    pub filter: Metadata,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::DEFAULT_TOP_K,
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            use_reranking: defaults::DEFAULT_USE_RERANKING,
            hybrid: defaults::DEFAULT_HYBRID,
            max_chunks: defaults::DEFAULT_MAX_CHUNKS,
            max_tokens: defaults::DEFAULT_MAX_TOKENS,
            filter: Metadata::new(),
        }
    }
}

impl RetrievalConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_reranking(mut self, enabled: bool) -> Self {
        self.use_reranking = enabled;
        self
    }

    pub fn with_hybrid(mut self, enabled: bool) -> Self {
        self.hybrid = enabled;
        self
    }

    pub fn with_filter(mut self, filter: Metadata) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_budget(mut self, max_chunks: usize, max_tokens: usize) -> Self {
        self.max_chunks = max_chunks;
        self.max_tokens = max_tokens;
        self
    }

    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.top_k == 0 {
            return Err(RetrievalError::InvalidConfig {
                reason: "top_k must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(RetrievalError::InvalidConfig {
                reason: format!(
                    "similarity_threshold {} outside [0, 1]",
                    self.similarity_threshold
                ),
            });
        }
        Ok(())
    }
}
