//! Query expansion for multi-query retrieval.

pub mod generator_expander;

pub use generator_expander::{parse_variants, GeneratorQueryExpander};
