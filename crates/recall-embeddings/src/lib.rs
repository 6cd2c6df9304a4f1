//! # recall-embeddings
//!
//! Embedding generation for the recall pipeline.
//!
//! ## Architecture
//!
//! ```text
//! Embedder
//! ├── primary IEmbeddingProvider (optional)
//! │   └── ApiEmbeddingProvider (OpenAI-compatible HTTP)
//! ├── HashedFallback (deterministic, offline, always available)
//! ├── L1MemoryCache (moka, primary vectors only)
//! └── DegradationTracker (shared with retrieval)
//! ```
//!
//! Rate-limit, quota and timeout failures of the primary provider fall back
//! to the hashed embedding per item. Other failures propagate unless the
//! config opts into falling back on any failure.

pub mod cache;
pub mod engine;
pub mod providers;
pub mod similarity;

pub use cache::L1MemoryCache;
pub use engine::Embedder;
pub use providers::{ApiEmbeddingProvider, HashedFallback};
pub use similarity::{clamp_unit, cosine_similarity, is_valid};
