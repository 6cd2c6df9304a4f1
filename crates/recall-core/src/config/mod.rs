pub mod defaults;

mod chunking_config;
mod embedding_config;
mod hybrid_config;
mod observability_config;
mod rerank_config;
mod retrieval_config;
mod store_config;

pub use chunking_config::ChunkingConfig;
pub use embedding_config::EmbeddingConfig;
pub use hybrid_config::HybridConfig;
pub use observability_config::ObservabilityConfig;
pub use rerank_config::RerankConfig;
pub use retrieval_config::RetrievalConfig;
pub use store_config::StoreConfig;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration. Every section is optional in TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub hybrid: HybridConfig,
    pub rerank: RerankConfig,
    pub store: StoreConfig,
    pub observability: ObservabilityConfig,
}

impl RecallConfig {
    /// Parse a TOML document. Missing sections and fields take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.dimensions == 0 {
            return Err(invalid("embedding.dimensions", "must be non-zero"));
        }
        if self.embedding.batch_size == 0 {
            return Err(invalid("embedding.batch_size", "must be non-zero"));
        }
        if self.embedding.request_timeout_ms == 0 {
            return Err(invalid("embedding.request_timeout_ms", "must be non-zero"));
        }
        if self.chunking.chunk_size == 0 {
            return Err(invalid("chunking.chunk_size", "must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.chunking.min_break_ratio) {
            return Err(invalid("chunking.min_break_ratio", "must be within [0, 1]"));
        }
        if self.hybrid.max_variants == 0 {
            return Err(invalid("hybrid.max_variants", "must include the original query"));
        }
        if self.hybrid.dedup_prefix_chars == 0 {
            return Err(invalid("hybrid.dedup_prefix_chars", "must be non-zero"));
        }
        if self.hybrid.expansion_timeout_ms == 0 {
            return Err(invalid("hybrid.expansion_timeout_ms", "must be non-zero"));
        }
        if self.rerank.timeout_ms == 0 {
            return Err(invalid("rerank.timeout_ms", "must be non-zero"));
        }
        self.retrieval
            .validate()
            .map_err(|e| invalid("retrieval", &e.to_string()))?;
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
