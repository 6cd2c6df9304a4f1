use serde::{Deserialize, Serialize};

/// Provenance of one passage placed into a generator context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextReference {
    pub source_id: String,
    pub source_type: String,
    pub chunk_id: String,
    pub similarity_score: f32,
}

/// A bounded context block ready for the downstream generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    pub text: String,
    pub references: Vec<ContextReference>,
}

impl AssembledContext {
    /// "No relevant context found" is a valid, non-error outcome.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.references.is_empty()
    }
}
