use async_trait::async_trait;

use crate::errors::RetrievalError;

/// Produces alternative formulations of a query.
#[async_trait]
pub trait IQueryExpander: Send + Sync {
    /// Return up to `max_variants` paraphrases. The original query is not
    /// required to be part of the output.
    async fn expand(&self, query: &str, max_variants: usize) -> Result<Vec<String>, RetrievalError>;
}
