use super::ProviderError;

/// Embedding subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("cannot embed empty text")]
    EmptyInput,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vector has zero magnitude")]
    ZeroMagnitude,

    #[error("embedding provider failed: {0}")]
    Provider(#[from] ProviderError),
}
