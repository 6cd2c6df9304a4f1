mod config_error;
mod embedding_error;
mod provider_error;
mod retrieval_error;
mod store_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use provider_error::ProviderError;
pub use retrieval_error::RetrievalError;
pub use store_error::StoreError;

/// Top-level error for the recall pipeline.
///
/// Only input errors and store errors normally reach callers; provider
/// failures are recovered inside the embedding and retrieval crates.
#[derive(Debug, thiserror::Error)]
pub enum RecallError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type RecallResult<T> = Result<T, RecallError>;
