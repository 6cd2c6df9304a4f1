//! Context assembly for the downstream generator.

pub mod assembler;

pub use assembler::{estimate_tokens, ContextAssembler};
