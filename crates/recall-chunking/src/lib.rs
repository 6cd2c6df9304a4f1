//! # recall-chunking
//!
//! Splits document text into overlapping windows for embedding.
//! Windows end on the most natural break available (sentence end,
//! paragraph, line, word) without shrinking below a minimum fraction of
//! the window size.

pub mod chunker;

pub use chunker::{split, Chunker};
