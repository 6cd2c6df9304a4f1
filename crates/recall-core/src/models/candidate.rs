use serde::{Deserialize, Serialize};

use super::Metadata;

/// A retrieved passage with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Opaque vector id in the store.
    pub id: String,
    /// Similarity or relevance score in [0, 1].
    pub score: f32,
    pub content: String,
    pub metadata: Metadata,
}

impl ScoredCandidate {
    /// Read a string metadata field.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

/// One entry of a re-ranking response. `index` points back into the
/// documents passed to the reranker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RerankResult {
    pub index: usize,
    pub relevance_score: f32,
}
