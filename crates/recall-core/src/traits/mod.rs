mod embedding;
mod generator;
mod query_expander;
mod reranker;
mod vector_store;

pub use embedding::{EmbedMode, IEmbeddingProvider};
pub use generator::IGenerator;
pub use query_expander::IQueryExpander;
pub use reranker::IRerankProvider;
pub use vector_store::IVectorStore;
