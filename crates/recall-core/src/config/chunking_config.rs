use serde::{Deserialize, Serialize};

use super::defaults;

/// Chunking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window size in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive windows.
    pub overlap: usize,
    /// Chunks whose trimmed length is below this are discarded.
    pub min_chunk_len: usize,
    /// A natural break may not shrink a chunk below this fraction of `chunk_size`.
    pub min_break_ratio: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: defaults::DEFAULT_CHUNK_SIZE,
            overlap: defaults::DEFAULT_CHUNK_OVERLAP,
            min_chunk_len: defaults::DEFAULT_MIN_CHUNK_LEN,
            min_break_ratio: defaults::DEFAULT_MIN_BREAK_RATIO,
        }
    }
}
