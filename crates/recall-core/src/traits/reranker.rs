use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::RerankResult;

/// Secondary relevance scoring over a candidate set.
#[async_trait]
pub trait IRerankProvider: Send + Sync {
    /// Score `documents` against `query`, returning at most `top_n` results.
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankResult>, ProviderError>;

    fn name(&self) -> &str;
}
