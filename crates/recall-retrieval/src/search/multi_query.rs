//! MultiQueryRetriever: hybrid search over several formulations of a query.
//!
//! expand → search each variant → dedup by content prefix → rerank once.
//! Any failure of expansion or re-ranking degrades to a plain similarity
//! search over the original query.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use recall_core::config::HybridConfig;
use recall_core::errors::{RecallError, RetrievalError};
use recall_core::models::{DegradationEvent, Metadata, ScoredCandidate};
use recall_core::traits::IQueryExpander;
use recall_observability::DegradationTracker;
use tracing::{debug, info, warn};

use super::similarity::SimilaritySearch;
use crate::ranking::Reranker;

const COMPONENT: &str = "hybrid_search";
const FALLBACK: &str = "similarity_search";

pub struct MultiQueryRetriever {
    search: Arc<SimilaritySearch>,
    expander: Option<Arc<dyn IQueryExpander>>,
    reranker: Arc<Reranker>,
    config: HybridConfig,
    tracker: Arc<DegradationTracker>,
}

impl MultiQueryRetriever {
    pub fn new(
        search: Arc<SimilaritySearch>,
        expander: Option<Arc<dyn IQueryExpander>>,
        reranker: Arc<Reranker>,
        config: HybridConfig,
    ) -> Self {
        Self {
            search,
            expander,
            reranker,
            config,
            tracker: Arc::new(DegradationTracker::new()),
        }
    }

    pub fn with_tracker(mut self, tracker: Arc<DegradationTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Hybrid search for `query`, returning at most `top_k` candidates.
    ///
    /// Only an empty query or a failure of the fallback search itself can
    /// surface as an error.
    pub async fn hybrid_search(
        &self,
        query: &str,
        top_k: usize,
        filter: &Metadata,
        threshold: f32,
    ) -> Result<Vec<ScoredCandidate>, RecallError> {
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery.into());
        }

        match self.try_hybrid(query, top_k, filter, threshold).await {
            Ok(candidates) => Ok(candidates),
            Err(e) => {
                warn!(error = %e, "hybrid search failed, using plain similarity search");
                self.tracker
                    .record(DegradationEvent::now(COMPONENT, e.to_string(), FALLBACK));
                self.search.search(query, top_k, filter, threshold).await
            }
        }
    }

    async fn try_hybrid(
        &self,
        query: &str,
        top_k: usize,
        filter: &Metadata,
        threshold: f32,
    ) -> Result<Vec<ScoredCandidate>, RecallError> {
        let variants = self.variants(query).await?;

        let per_variant = self.config.per_variant_top_k.max(1);
        let results = join_all(
            variants
                .iter()
                .map(|v| self.search.search(v, per_variant, filter, threshold)),
        )
        .await;

        let mut accumulated = Vec::new();
        let mut first_error = None;
        let mut failed = 0;
        for (variant, result) in variants.iter().zip(results) {
            match result {
                Ok(found) => accumulated.extend(found),
                Err(e) => {
                    warn!(variant = %variant, error = %e, "variant search failed");
                    failed += 1;
                    first_error.get_or_insert(e);
                }
            }
        }
        if failed == variants.len() {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        let mut merged = dedup_by_prefix(accumulated, self.config.dedup_prefix_chars);
        debug!(variants = variants.len(), merged = merged.len(), "hybrid candidates merged");

        if merged.len() > 1 {
            if self.reranker.is_enabled() {
                let documents: Vec<String> = merged.iter().map(|c| c.content.clone()).collect();
                let results = self
                    .reranker
                    .try_rerank(query, &documents, documents.len())
                    .await
                    .map_err(|e| RetrievalError::RerankFailed {
                        reason: e.to_string(),
                    })?;
                merged = Reranker::apply(merged, &results, threshold);
            } else {
                merged.sort_by(|a, b| b.score.total_cmp(&a.score));
            }
        }

        merged.truncate(top_k);
        info!(variants = variants.len(), returned = merged.len(), "hybrid search complete");
        Ok(merged)
    }

    /// The original query followed by distinct expansions, at most
    /// `max_variants` in total.
    async fn variants(&self, query: &str) -> Result<Vec<String>, RetrievalError> {
        let max = self.config.max_variants.max(1);
        let mut variants = vec![query.to_string()];
        let Some(expander) = &self.expander else {
            return Ok(variants);
        };
        if max == 1 {
            return Ok(variants);
        }

        let timeout = Duration::from_millis(self.config.expansion_timeout_ms);
        let expanded = tokio::time::timeout(timeout, expander.expand(query, max - 1))
            .await
            .map_err(|_| RetrievalError::ExpansionFailed {
                reason: format!("timed out after {}ms", self.config.expansion_timeout_ms),
            })??;

        for v in expanded {
            let v = v.trim();
            if variants.len() >= max {
                break;
            }
            if v.is_empty() || variants.iter().any(|existing| existing.eq_ignore_ascii_case(v)) {
                continue;
            }
            variants.push(v.to_string());
        }
        Ok(variants)
    }
}

/// Keep one candidate per content prefix, in first-seen order, with the
/// best score any copy reached.
fn dedup_by_prefix(candidates: Vec<ScoredCandidate>, prefix_chars: usize) -> Vec<ScoredCandidate> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<ScoredCandidate> = Vec::with_capacity(candidates.len());
    for c in candidates {
        let key: String = c.content.chars().take(prefix_chars).collect();
        match seen.get(&key) {
            Some(&i) => {
                if c.score > out[i].score {
                    out[i].score = c.score;
                }
            }
            None => {
                seen.insert(key, out.len());
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use recall_core::config::EmbeddingConfig;
    use recall_core::traits::IVectorStore;
    use recall_embeddings::Embedder;
    use test_fixtures::InMemoryVectorStore;

    use super::*;

    /// Returns every scripted line regardless of the requested count.
    struct UnboundedExpander(Vec<&'static str>);

    #[async_trait]
    impl IQueryExpander for UnboundedExpander {
        async fn expand(&self, _query: &str, _max: usize) -> Result<Vec<String>, RetrievalError> {
            Ok(self.0.iter().map(|v| v.to_string()).collect())
        }
    }

    fn retriever(
        expander: Option<Arc<dyn IQueryExpander>>,
        max_variants: usize,
    ) -> MultiQueryRetriever {
        let embedder = Arc::new(Embedder::offline(EmbeddingConfig {
            dimensions: 64,
            ..Default::default()
        }));
        let store: Arc<dyn IVectorStore> = Arc::new(InMemoryVectorStore::new());
        let search = Arc::new(SimilaritySearch::new(embedder, store, "default"));
        let config = HybridConfig {
            max_variants,
            ..Default::default()
        };
        MultiQueryRetriever::new(search, expander, Arc::new(Reranker::disabled()), config)
    }

    fn candidate(id: &str, content: &str, score: f32) -> ScoredCandidate {
        ScoredCandidate {
            id: id.to_string(),
            score,
            content: content.to_string(),
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn dedup_compares_prefix_only() {
        let shared = "x".repeat(100);
        let candidates = vec![
            candidate("a", &format!("{shared} tail one"), 0.8),
            candidate("b", &format!("{shared} tail two"), 0.9),
            candidate("c", "different", 0.7),
        ];
        let out = dedup_by_prefix(candidates, 100);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "a");
        assert_eq!(out[0].score, 0.9);
        assert_eq!(out[1].id, "c");
    }

    #[test]
    fn dedup_ignores_ids() {
        let candidates = vec![
            candidate("doc:0", "same passage", 0.8),
            candidate("other:3", "same passage", 0.8),
        ];
        assert_eq!(dedup_by_prefix(candidates, 100).len(), 1);
    }

    #[tokio::test]
    async fn variants_keep_original_first_and_drop_blank_or_repeated() {
        let expander: Arc<dyn IQueryExpander> =
            Arc::new(UnboundedExpander(vec!["Orig Query", "a", "  ", "b", "A", "c", "d"]));
        let retriever = retriever(Some(expander), 4);

        let variants = retriever.variants("orig query").await.unwrap();
        assert_eq!(variants, vec!["orig query", "a", "b", "c"]);
    }

    #[tokio::test]
    async fn variants_never_exceed_max() {
        let expander: Arc<dyn IQueryExpander> =
            Arc::new(UnboundedExpander(vec!["one", "two", "three", "four", "five"]));
        for max in 1..=4 {
            let retriever = retriever(Some(expander.clone()), max);
            let variants = retriever.variants("query").await.unwrap();
            assert_eq!(variants.len(), max);
            assert_eq!(variants[0], "query");
        }
    }

    #[tokio::test]
    async fn no_expander_searches_original_only() {
        let retriever = retriever(None, 4);
        assert_eq!(retriever.variants("just this").await.unwrap(), vec!["just this"]);
    }
}
