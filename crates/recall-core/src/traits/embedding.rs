use async_trait::async_trait;

use crate::errors::ProviderError;

/// Whether texts are embedded for storage or for querying. Some providers
/// use asymmetric models and need the hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedMode {
    Document,
    Query,
}

impl EmbedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Query => "query",
        }
    }
}

/// Embedding generation provider.
#[async_trait]
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed several texts, returning one vector per input in input order.
    async fn embed_many(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, ProviderError>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
