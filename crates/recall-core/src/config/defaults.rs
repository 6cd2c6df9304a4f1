// Single source of truth for all default values.

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "hash";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1024;
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 5;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 200;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_FALLBACK_ON_ANY_FAILURE: bool = false;
pub const DEFAULT_EMBEDDING_CACHE_SIZE: u64 = 10_000;

// --- Chunking ---
pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;
pub const DEFAULT_MIN_CHUNK_LEN: usize = 20;
pub const DEFAULT_MIN_BREAK_RATIO: f64 = 0.7;

// --- Retrieval ---
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.7;
pub const DEFAULT_USE_RERANKING: bool = false;
pub const DEFAULT_HYBRID: bool = false;
pub const DEFAULT_MAX_CHUNKS: usize = 5;
pub const DEFAULT_MAX_TOKENS: usize = 2_000;

// --- Hybrid search ---
pub const DEFAULT_MAX_VARIANTS: usize = 4;
pub const DEFAULT_PER_VARIANT_TOP_K: usize = 3;
pub const DEFAULT_DEDUP_PREFIX_CHARS: usize = 100;

// --- Re-ranking ---
pub const DEFAULT_RERANK_PROVIDER: &str = "none";
pub const DEFAULT_RERANK_MODEL: &str = "rerank-english-v3.0";
pub const DEFAULT_RERANK_TIMEOUT_MS: u64 = 10_000;

// --- Store ---
pub const DEFAULT_NAMESPACE: &str = "default";

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
