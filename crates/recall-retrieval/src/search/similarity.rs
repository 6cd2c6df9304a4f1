//! Single-query similarity search.

use std::sync::Arc;

use recall_core::constants::META_CONTENT;
use recall_core::errors::{RecallError, RetrievalError};
use recall_core::models::{Metadata, ScoredCandidate, StoreMatch};
use recall_core::traits::IVectorStore;
use recall_embeddings::{clamp_unit, Embedder};
use tracing::debug;

use super::access::AccessNotifier;

/// Embeds a query and asks the vector store for its nearest chunks.
pub struct SimilaritySearch {
    embedder: Arc<Embedder>,
    store: Arc<dyn IVectorStore>,
    namespace: String,
    notifier: AccessNotifier,
}

impl SimilaritySearch {
    pub fn new(
        embedder: Arc<Embedder>,
        store: Arc<dyn IVectorStore>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            store,
            namespace: namespace.into(),
            notifier: AccessNotifier::disabled(),
        }
    }

    pub fn with_notifier(mut self, notifier: AccessNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Return the store's `top_k` nearest chunks scoring at least `threshold`.
    ///
    /// Store scores are clamped to [0, 1] before the threshold applies.
    /// Order is the store's (descending score). Store errors propagate:
    /// there is no local substitute for the index itself.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        filter: &Metadata,
        threshold: f32,
    ) -> Result<Vec<ScoredCandidate>, RecallError> {
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery.into());
        }

        let vector = self.embedder.embed_query(query).await?;
        let matches = self
            .store
            .query(&self.namespace, &vector, top_k, filter)
            .await?;
        let returned = matches.len();

        let candidates: Vec<ScoredCandidate> = matches
            .into_iter()
            .map(to_candidate)
            .filter(|c| c.score >= threshold)
            .collect();

        debug!(
            namespace = %self.namespace,
            returned,
            kept = candidates.len(),
            threshold,
            "similarity search"
        );

        self.notifier
            .notify(&self.namespace, candidates.iter().map(|c| c.id.clone()).collect());

        Ok(candidates)
    }
}

fn to_candidate(m: StoreMatch) -> ScoredCandidate {
    let content = m
        .metadata
        .get(META_CONTENT)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    ScoredCandidate {
        id: m.id,
        score: clamp_unit(m.score),
        content,
        metadata: m.metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn candidate_takes_content_from_metadata_and_clamps_score() {
        let mut metadata = Metadata::new();
        metadata.insert(META_CONTENT.to_string(), json!("passage"));
        let c = to_candidate(StoreMatch {
            id: "a:0".to_string(),
            score: 1.3,
            metadata,
        });
        assert_eq!(c.content, "passage");
        assert_eq!(c.score, 1.0);

        let c = to_candidate(StoreMatch {
            id: "b:0".to_string(),
            score: -0.2,
            metadata: Metadata::new(),
        });
        assert_eq!(c.content, "");
        assert_eq!(c.score, 0.0);
    }
}
