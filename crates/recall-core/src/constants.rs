/// recall version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Approximate characters per token used for context budgeting.
pub const CHARS_PER_TOKEN: usize = 4;

/// Relevance score assigned to every document when re-ranking is unavailable.
pub const NEUTRAL_RELEVANCE: f32 = 0.5;

/// Number of neighbouring buckets each word feeds in the hashed fallback embedding.
pub const FALLBACK_NEIGHBOURHOOD: usize = 3;

/// Metadata keys written alongside every stored chunk.
pub const META_SOURCE_ID: &str = "source_id";
pub const META_SOURCE_TYPE: &str = "source_type";
pub const META_CHUNK_INDEX: &str = "chunk_index";
pub const META_TOTAL_CHUNKS: &str = "total_chunks";
pub const META_CONTENT: &str = "content";

/// Source type recorded when the caller does not supply one.
pub const DEFAULT_SOURCE_TYPE: &str = "document";
