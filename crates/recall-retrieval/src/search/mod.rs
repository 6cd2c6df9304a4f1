//! Vector search: single-query similarity search, the multi-query
//! retriever built on top of it, and the access-notification side channel.

pub mod access;
pub mod multi_query;
pub mod similarity;

pub use access::AccessNotifier;
pub use multi_query::MultiQueryRetriever;
pub use similarity::SimilaritySearch;
