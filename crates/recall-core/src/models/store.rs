use serde::{Deserialize, Serialize};

use super::Metadata;

/// A raw nearest-neighbour hit reported by the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Metadata,
}

/// Summary statistics of one store namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub namespace: String,
    pub vector_count: usize,
    pub dimensions: Option<usize>,
}
