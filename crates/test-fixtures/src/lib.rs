//! Test fixtures for recall: scripted providers, an in-memory vector store,
//! and a small golden corpus.
//!
//! Every fake here is deterministic. Failure modes are switched on per
//! instance so a test can script exactly one degraded collaborator.

pub mod generation;
pub mod providers;
pub mod store;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use generation::{ScriptedExpander, ScriptedGenerator};
pub use providers::{Behavior, ScriptedEmbeddingProvider, ScriptedRerankProvider};
pub use store::InMemoryVectorStore;

/// Root directory of the bundled fixture data.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// One document of the golden corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusDocument {
    pub source_id: String,
    pub source_type: String,
    pub text: String,
}

/// A query with the source it should retrieve first.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusQuery {
    pub query: String,
    pub expected_source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Corpus {
    pub documents: Vec<CorpusDocument>,
    pub queries: Vec<CorpusQuery>,
}

/// Load the golden retrieval corpus.
pub fn corpus() -> Corpus {
    load_fixture("corpus.json")
}

/// Build a metadata map from string pairs.
pub fn metadata(pairs: &[(&str, &str)]) -> recall_core::Metadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_loads() {
        let corpus = corpus();
        assert!(!corpus.documents.is_empty());
        for q in &corpus.queries {
            assert!(corpus.documents.iter().any(|d| d.source_id == q.expected_source));
        }
    }
}
