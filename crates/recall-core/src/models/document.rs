use serde::{Deserialize, Serialize};

/// Outcome of storing one chunk of a processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResult {
    pub chunk_id: String,
    pub index: usize,
    pub success: bool,
    pub error: Option<String>,
}

/// Outcome of `process_document`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    pub source_id: String,
    pub chunk_count: usize,
    pub chunk_results: Vec<ChunkResult>,
}

impl ProcessResult {
    pub fn stored(&self) -> usize {
        self.chunk_results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.chunk_count - self.stored()
    }
}
