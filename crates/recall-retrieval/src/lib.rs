//! # recall-retrieval
//!
//! Turns a query into a bounded, cited context block.
//!
//! ```text
//! query ─► SimilaritySearch ─► (Reranker) ─► ContextAssembler ─► text + references
//!   └────► MultiQueryRetriever: expand ─► search per variant ─► dedup ─► rerank
//! ```
//!
//! [`RetrievalEngine`] wires the stages together and also owns document
//! ingestion (`process_document`).

pub mod context;
pub mod engine;
pub mod expansion;
pub mod ranking;
pub mod search;

pub use context::ContextAssembler;
pub use engine::RetrievalEngine;
pub use expansion::GeneratorQueryExpander;
pub use ranking::{ApiRerankProvider, Reranker};
pub use search::{AccessNotifier, MultiQueryRetriever, SimilaritySearch};
