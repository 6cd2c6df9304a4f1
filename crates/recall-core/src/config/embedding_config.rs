use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider: "api" or "hash" (offline only).
    pub provider: String,
    /// Endpoint of an OpenAI-compatible embeddings API.
    pub endpoint: Option<String>,
    /// Model name sent to the API.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Embedding dimensions. Must match the vector store.
    pub dimensions: usize,
    /// Texts embedded concurrently per sub-batch.
    pub batch_size: usize,
    /// Pause between sub-batches (milliseconds).
    pub batch_delay_ms: u64,
    /// Upper bound on a single provider call (milliseconds).
    pub request_timeout_ms: u64,
    /// Fall back on every provider failure, not only rate limits.
    pub fallback_on_any_failure: bool,
    /// L1 in-memory cache max entries. Zero disables the cache.
    pub cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            endpoint: None,
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key_env: None,
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            batch_size: defaults::DEFAULT_EMBEDDING_BATCH_SIZE,
            batch_delay_ms: defaults::DEFAULT_BATCH_DELAY_MS,
            request_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
            fallback_on_any_failure: defaults::DEFAULT_FALLBACK_ON_ANY_FAILURE,
            cache_size: defaults::DEFAULT_EMBEDDING_CACHE_SIZE,
        }
    }
}
