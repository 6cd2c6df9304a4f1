/// Failures reported by an external provider (embedding, rerank, generator).
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} rate limited")]
    RateLimited { provider: String },

    #[error("{provider} quota exceeded")]
    QuotaExceeded { provider: String },

    #[error("{provider} timed out after {after_ms}ms")]
    Timeout { provider: String, after_ms: u64 },

    #[error("{provider} request failed: {reason}")]
    Request { provider: String, reason: String },

    #[error("{provider} returned an invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ProviderError {
    /// Rate-limit, quota, and timeout failures are transient and trigger
    /// local fallback instead of propagating.
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::QuotaExceeded { .. } | Self::Timeout { .. }
        )
    }

    pub fn provider(&self) -> &str {
        match self {
            Self::RateLimited { provider }
            | Self::QuotaExceeded { provider }
            | Self::Timeout { provider, .. }
            | Self::Request { provider, .. }
            | Self::InvalidResponse { provider, .. } => provider,
        }
    }
}
