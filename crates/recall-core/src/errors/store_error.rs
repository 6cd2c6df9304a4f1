/// Vector store errors. These are surfaced to callers: there is no safe
/// local substitute for the store itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("vector store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("vector store query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("vector store write failed for {id}: {reason}")]
    WriteFailed { id: String, reason: String },

    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("corrupt record {id}: {details}")]
    Corrupt { id: String, details: String },

    #[error("namespace {namespace} holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch {
        namespace: String,
        expected: usize,
        actual: usize,
    },
}
