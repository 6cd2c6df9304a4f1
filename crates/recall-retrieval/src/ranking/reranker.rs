//! Re-ranking with neutral degradation.
//!
//! A reranker that cannot reach its provider still answers: every
//! document comes back with the neutral relevance in original order.

use std::sync::Arc;
use std::time::Duration;

use recall_core::constants::NEUTRAL_RELEVANCE;
use recall_core::errors::ProviderError;
use recall_core::models::{DegradationEvent, RerankResult, ScoredCandidate};
use recall_core::traits::IRerankProvider;
use recall_embeddings::clamp_unit;
use recall_observability::DegradationTracker;
use tracing::{debug, warn};

const COMPONENT: &str = "reranker";
const FALLBACK: &str = "neutral-relevance";

pub struct Reranker {
    provider: Option<Arc<dyn IRerankProvider>>,
    timeout: Duration,
    tracker: Arc<DegradationTracker>,
}

impl Reranker {
    pub fn new(provider: Arc<dyn IRerankProvider>, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
            tracker: Arc::new(DegradationTracker::new()),
        }
    }

    /// A reranker with no provider. `rerank` answers neutrally.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            timeout: Duration::ZERO,
            tracker: Arc::new(DegradationTracker::new()),
        }
    }

    pub fn with_tracker(mut self, tracker: Arc<DegradationTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Call the provider, surfacing its failures.
    ///
    /// Results are validated: every index must point into `documents` and
    /// scores are clamped to [0, 1]. Returned in provider order.
    pub async fn try_rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankResult>, ProviderError> {
        let Some(provider) = &self.provider else {
            return Err(ProviderError::Request {
                provider: "none".to_string(),
                reason: "no rerank provider configured".to_string(),
            });
        };
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let timeout_ms = self.timeout.as_millis() as u64;
        let results = tokio::time::timeout(self.timeout, provider.rerank(query, documents, top_n))
            .await
            .map_err(|_| ProviderError::Timeout {
                provider: provider.name().to_string(),
                after_ms: timeout_ms,
            })??;

        if let Some(bad) = results.iter().find(|r| r.index >= documents.len()) {
            return Err(ProviderError::InvalidResponse {
                provider: provider.name().to_string(),
                reason: format!("index {} out of range for {} documents", bad.index, documents.len()),
            });
        }

        debug!(
            provider = provider.name(),
            documents = documents.len(),
            results = results.len(),
            "rerank complete"
        );

        Ok(results
            .into_iter()
            .map(|r| RerankResult {
                index: r.index,
                relevance_score: clamp_unit(r.relevance_score),
            })
            .collect())
    }

    /// Re-rank `documents`, never failing.
    ///
    /// On provider failure (or with no provider) every document is returned
    /// with [`NEUTRAL_RELEVANCE`] at its original index, in original order.
    pub async fn rerank(&self, query: &str, documents: &[String], top_n: usize) -> Vec<RerankResult> {
        match self.try_rerank(query, documents, top_n).await {
            Ok(results) => results,
            Err(e) => {
                if self.is_enabled() {
                    warn!(error = %e, "rerank failed, returning neutral scores");
                    self.tracker
                        .record(DegradationEvent::now(COMPONENT, e.to_string(), FALLBACK));
                }
                Self::neutral(documents.len())
            }
        }
    }

    /// Every index in order with the neutral score.
    pub fn neutral(count: usize) -> Vec<RerankResult> {
        (0..count)
            .map(|index| RerankResult {
                index,
                relevance_score: NEUTRAL_RELEVANCE,
            })
            .collect()
    }

    /// Reorder candidates by rerank relevance, keeping those at or above
    /// `threshold`. Candidate scores become the relevance scores.
    pub fn apply(
        candidates: Vec<ScoredCandidate>,
        results: &[RerankResult],
        threshold: f32,
    ) -> Vec<ScoredCandidate> {
        let mut slots: Vec<Option<ScoredCandidate>> = candidates.into_iter().map(Some).collect();
        results
            .iter()
            .filter(|r| r.relevance_score >= threshold)
            .filter_map(|r| {
                let mut c = slots.get_mut(r.index)?.take()?;
                c.score = r.relevance_score;
                Some(c)
            })
            .collect()
    }

    /// Re-rank already-retrieved candidates for the plain search path.
    ///
    /// When the provider is unavailable the candidates are kept as they are:
    /// they already passed the similarity threshold, and neutral scores
    /// carry no ranking information.
    pub async fn rerank_candidates(
        &self,
        query: &str,
        candidates: Vec<ScoredCandidate>,
        threshold: f32,
    ) -> Vec<ScoredCandidate> {
        if candidates.len() < 2 || !self.is_enabled() {
            return candidates;
        }
        let documents: Vec<String> = candidates.iter().map(|c| c.content.clone()).collect();
        match self.try_rerank(query, &documents, documents.len()).await {
            Ok(results) => Self::apply(candidates, &results, threshold),
            Err(e) => {
                warn!(error = %e, "rerank failed, keeping similarity order");
                self.tracker.record(DegradationEvent::now(
                    COMPONENT,
                    e.to_string(),
                    "similarity-order",
                ));
                candidates
            }
        }
    }
}
