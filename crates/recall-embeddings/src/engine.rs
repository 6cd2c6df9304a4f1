//! Embedder: the main entry point for recall-embeddings.
//!
//! Wraps an optional primary provider, the hashed fallback, the L1 cache
//! and degradation tracking into one interface. Every call is independent;
//! the only state shared across calls is the cache and the tracker.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use recall_core::config::EmbeddingConfig;
use recall_core::errors::{EmbeddingError, ProviderError};
use recall_core::models::DegradationEvent;
use recall_core::traits::{EmbedMode, IEmbeddingProvider};
use recall_observability::DegradationTracker;
use tracing::{debug, info, warn};

use crate::cache::L1MemoryCache;
use crate::providers::{self, HashedFallback};
use crate::similarity;

const COMPONENT: &str = "embeddings";

/// Text-to-vector converter with deterministic offline fallback.
pub struct Embedder {
    primary: Option<Arc<dyn IEmbeddingProvider>>,
    fallback: HashedFallback,
    cache: Option<L1MemoryCache>,
    config: EmbeddingConfig,
    tracker: Arc<DegradationTracker>,
}

impl Embedder {
    /// Create an embedder around an injected primary provider.
    ///
    /// Fails if the provider's dimensions disagree with the config, since
    /// every vector this embedder produces must share one dimension.
    pub fn new(
        primary: Option<Arc<dyn IEmbeddingProvider>>,
        config: EmbeddingConfig,
    ) -> Result<Self, EmbeddingError> {
        if let Some(p) = &primary {
            if p.dimensions() != config.dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: config.dimensions,
                    actual: p.dimensions(),
                });
            }
        }
        Ok(Self::build(primary, config))
    }

    /// Create an embedder from configuration alone.
    pub fn from_config(config: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let primary = providers::create_primary(&config);
        Self::new(primary, config)
    }

    /// Create an embedder that only uses the hashed fallback.
    pub fn offline(config: EmbeddingConfig) -> Self {
        Self::build(None, config)
    }

    fn build(primary: Option<Arc<dyn IEmbeddingProvider>>, config: EmbeddingConfig) -> Self {
        let cache = (config.cache_size > 0).then(|| L1MemoryCache::new(config.cache_size));
        let fallback = HashedFallback::new(config.dimensions);

        info!(
            provider = primary.as_ref().map(|p| p.name()).unwrap_or(fallback.name()),
            dims = config.dimensions,
            batch_size = config.batch_size,
            "Embedder initialized"
        );

        Self {
            primary,
            fallback,
            cache,
            config,
            tracker: Arc::new(DegradationTracker::new()),
        }
    }

    /// Share a degradation tracker with other components.
    pub fn with_tracker(mut self, tracker: Arc<DegradationTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn tracker(&self) -> &Arc<DegradationTracker> {
        &self.tracker
    }

    /// The fixed dimension of every vector this embedder returns.
    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    /// Name of the provider tried first.
    pub fn active_provider(&self) -> &str {
        self.primary
            .as_ref()
            .map(|p| p.name())
            .unwrap_or(self.fallback.name())
    }

    /// Whether `vector` is a usable embedding for this embedder.
    pub fn is_valid(&self, vector: &[f32]) -> bool {
        similarity::is_valid(vector, self.config.dimensions)
    }

    /// Cosine similarity of two embeddings produced by this embedder.
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
        if a.len() != self.config.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimensions,
                actual: a.len(),
            });
        }
        similarity::cosine_similarity(a, b)
    }

    /// Embed a single text.
    pub async fn embed(&self, text: &str, mode: EmbedMode) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_one(text, mode).await
    }

    /// Embed a search query.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_one(query, EmbedMode::Query).await
    }

    /// Embed documents for storage. See [`Embedder::embed_batch_with_mode`].
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.embed_batch_with_mode(texts, EmbedMode::Document).await
    }

    /// Embed many texts, one vector per input, in input order.
    ///
    /// Texts are processed in sub-batches of `batch_size` concurrent calls,
    /// with `batch_delay_ms` between sub-batches. Each item falls back on
    /// its own, so one rate-limited item never aborts the batch.
    pub async fn embed_batch_with_mode(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if let Some(index) = texts.iter().position(|t| t.trim().is_empty()) {
            warn!(index, "batch contains empty text");
            return Err(EmbeddingError::EmptyInput);
        }

        let batch_size = self.config.batch_size.max(1);
        let delay = Duration::from_millis(self.config.batch_delay_ms);
        let mut vectors = Vec::with_capacity(texts.len());

        for (i, sub_batch) in texts.chunks(batch_size).enumerate() {
            if i > 0 && self.primary.is_some() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let results = join_all(sub_batch.iter().map(|t| self.embed_one(t, mode))).await;
            for result in results {
                vectors.push(result?);
            }
        }

        debug!(count = vectors.len(), mode = mode.as_str(), "batch embedded");
        Ok(vectors)
    }

    async fn embed_one(&self, text: &str, mode: EmbedMode) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let Some(primary) = &self.primary else {
            return Ok(self.fallback.embed_text(text));
        };

        let key = L1MemoryCache::key(text, mode);
        if let Some(vec) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            debug!(mode = mode.as_str(), "cache hit for embedding");
            return Ok(vec);
        }

        match self.call_primary(primary.as_ref(), text, mode).await {
            Ok(vec) => {
                self.tracker.mark_recovered(COMPONENT);
                if let Some(cache) = &self.cache {
                    cache.insert(key, vec.clone());
                }
                Ok(vec)
            }
            Err(e) if e.is_rate_limit() || self.config.fallback_on_any_failure => {
                warn!(
                    provider = e.provider(),
                    error = %e,
                    "primary embedding failed, using hashed fallback"
                );
                self.tracker.record(DegradationEvent::now(
                    COMPONENT,
                    e.to_string(),
                    self.fallback.name(),
                ));
                Ok(self.fallback.embed_text(text))
            }
            Err(e) => Err(EmbeddingError::Provider(e)),
        }
    }

    /// One bounded call to the primary provider, validated for shape.
    async fn call_primary(
        &self,
        primary: &dyn IEmbeddingProvider,
        text: &str,
        mode: EmbedMode,
    ) -> Result<Vec<f32>, ProviderError> {
        let texts = [text.to_string()];
        let timeout_ms = self.config.request_timeout_ms;

        let vectors = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            primary.embed_many(&texts, mode),
        )
        .await
        .map_err(|_| ProviderError::Timeout {
            provider: primary.name().to_string(),
            after_ms: timeout_ms,
        })??;

        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: primary.name().to_string(),
                reason: "empty response".to_string(),
            })?;

        if !self.is_valid(&vector) {
            return Err(ProviderError::InvalidResponse {
                provider: primary.name().to_string(),
                reason: format!(
                    "expected {} finite dimensions, got {}",
                    self.config.dimensions,
                    vector.len()
                ),
            });
        }

        Ok(vector)
    }
}
