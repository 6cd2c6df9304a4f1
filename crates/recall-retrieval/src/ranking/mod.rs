//! Re-ranking: the graceful [`Reranker`] and its HTTP provider.

pub mod api_provider;
pub mod reranker;

pub use api_provider::{create_rerank_provider, ApiRerankProvider};
pub use reranker::Reranker;
