mod candidate;
mod chunk;
mod context;
mod degradation_event;
mod document;
mod generation;
mod store;

pub use candidate::{RerankResult, ScoredCandidate};
pub use chunk::Chunk;
pub use context::{AssembledContext, ContextReference};
pub use degradation_event::DegradationEvent;
pub use document::{ChunkResult, ProcessResult};
pub use generation::{GeneratorMessage, GeneratorOutput, MessageRole};
pub use store::{StoreMatch, StoreStats};

/// Free-form metadata attached to stored chunks and used as store filters.
pub type Metadata = serde_json::Map<String, serde_json::Value>;
