use serde::{Deserialize, Serialize};

use super::defaults;

/// Re-ranking provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankConfig {
    /// Re-rank provider: "api" or "none".
    pub provider: String,
    /// Endpoint of a Cohere/Jina-style rerank API.
    pub endpoint: Option<String>,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Upper bound on a single rerank call (milliseconds).
    pub timeout_ms: u64,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_RERANK_PROVIDER.to_string(),
            endpoint: None,
            model: defaults::DEFAULT_RERANK_MODEL.to_string(),
            api_key_env: None,
            timeout_ms: defaults::DEFAULT_RERANK_TIMEOUT_MS,
        }
    }
}
