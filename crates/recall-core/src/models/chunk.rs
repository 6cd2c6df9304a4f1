use serde::{Deserialize, Serialize};

/// A bounded excerpt of a document, produced for independent embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Trimmed chunk text.
    pub text: String,
    /// Position in document order, starting at 0.
    pub index: usize,
    /// Number of chunks the document produced.
    pub total_chunks: usize,
    /// Char offset where the chunk's window starts.
    pub start: usize,
    /// Char offset one past the end of the chunk's window.
    pub end: usize,
}
