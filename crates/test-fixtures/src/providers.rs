//! Scripted embedding and rerank providers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use recall_core::errors::ProviderError;
use recall_core::models::RerankResult;
use recall_core::traits::{EmbedMode, IEmbeddingProvider, IRerankProvider};

/// How a scripted provider answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Succeed,
    RateLimited,
    QuotaExceeded,
    Fail,
    /// Sleep for the given duration before succeeding.
    Stall(Duration),
}

impl Behavior {
    fn error(self, provider: &str) -> Option<ProviderError> {
        let provider = provider.to_string();
        match self {
            Self::Succeed | Self::Stall(_) => None,
            Self::RateLimited => Some(ProviderError::RateLimited { provider }),
            Self::QuotaExceeded => Some(ProviderError::QuotaExceeded { provider }),
            Self::Fail => Some(ProviderError::Request {
                provider,
                reason: "scripted failure".to_string(),
            }),
        }
    }

    async fn stall(self) {
        if let Self::Stall(d) = self {
            tokio::time::sleep(d).await;
        }
    }
}

/// Embedding provider with a bag-of-words embedding distinct from the
/// hashed fallback, so tests can tell which one produced a vector.
pub struct ScriptedEmbeddingProvider {
    dimensions: usize,
    behavior: Mutex<Behavior>,
    overrides: Mutex<HashMap<String, Vec<f32>>>,
    calls: AtomicUsize,
}

impl ScriptedEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            behavior: Mutex::new(Behavior::Succeed),
            overrides: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_behavior(self, behavior: Behavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    /// Switch behavior mid-test.
    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// Return `vector` whenever `text` is embedded.
    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.overrides.lock().unwrap().insert(text.to_string(), vector);
        self
    }

    /// Number of `embed_many` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The vector this provider returns for `text` when it succeeds.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(v) = self.overrides.lock().unwrap().get(text) {
            return v.clone();
        }
        let dims = self.dimensions.max(1);
        let mut vec = vec![0.0f32; dims];
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            let bucket = word
                .bytes()
                .fold(7usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
                % dims;
            vec[bucket] += 1.0;
        }
        let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vec.iter_mut().for_each(|x| *x /= norm);
        }
        vec
    }
}

#[async_trait]
impl IEmbeddingProvider for ScriptedEmbeddingProvider {
    async fn embed_many(
        &self,
        texts: &[String],
        _mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = *self.behavior.lock().unwrap();
        behavior.stall().await;
        if let Some(err) = behavior.error(self.name()) {
            return Err(err);
        }
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "scripted-embedding"
    }
}

/// Rerank provider that returns fixed scores by document index.
pub struct ScriptedRerankProvider {
    scores: Vec<f32>,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl ScriptedRerankProvider {
    /// `scores[i]` is the relevance of document `i`. Documents past the
    /// end of `scores` get 0.0.
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            scores,
            behavior: Behavior::Succeed,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self::new(Vec::new()).with_behavior(Behavior::Fail)
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IRerankProvider for ScriptedRerankProvider {
    async fn rerank(
        &self,
        _query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.behavior.stall().await;
        if let Some(err) = self.behavior.error(self.name()) {
            return Err(err);
        }
        let mut results: Vec<RerankResult> = (0..documents.len())
            .map(|index| RerankResult {
                index,
                relevance_score: self.scores.get(index).copied().unwrap_or(0.0),
            })
            .collect();
        results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        results.truncate(top_n);
        Ok(results)
    }

    fn name(&self) -> &str {
        "scripted-rerank"
    }
}
