/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("query expansion failed: {reason}")]
    ExpansionFailed { reason: String },

    #[error("re-ranking failed: {reason}")]
    RerankFailed { reason: String },

    #[error("invalid retrieval config: {reason}")]
    InvalidConfig { reason: String },
}
