use serde::{Deserialize, Serialize};

use super::defaults;

/// Multi-query (hybrid) search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfig {
    /// Total query variants including the original.
    pub max_variants: usize,
    /// Neighbours requested per variant.
    pub per_variant_top_k: usize,
    /// Leading characters compared when deduplicating candidates.
    pub dedup_prefix_chars: usize,
    /// Upper bound on the query expansion call (milliseconds).
    pub expansion_timeout_ms: u64,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            max_variants: defaults::DEFAULT_MAX_VARIANTS,
            per_variant_top_k: defaults::DEFAULT_PER_VARIANT_TOP_K,
            dedup_prefix_chars: defaults::DEFAULT_DEDUP_PREFIX_CHARS,
            expansion_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}
