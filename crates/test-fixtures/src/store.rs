//! In-memory vector store with scriptable failures.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recall_core::errors::StoreError;
use recall_core::models::{Metadata, StoreMatch, StoreStats};
use recall_core::traits::IVectorStore;

type Key = (String, String);

/// Brute-force cosine store. Scores are raw cosine values, so callers see
/// the same unclamped range a real store may report.
#[derive(Default)]
pub struct InMemoryVectorStore {
    entries: Mutex<BTreeMap<Key, (Vec<f32>, Metadata)>>,
    scripted: Mutex<Option<Vec<StoreMatch>>>,
    accesses: Mutex<Vec<(String, Vec<String>)>>,
    fail_queries: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `query` always returns `matches`, ignoring the vector.
    pub fn scripted(matches: Vec<StoreMatch>) -> Self {
        let store = Self::default();
        *store.scripted.lock().unwrap() = Some(matches);
        store
    }

    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every `record_access` call as (namespace, ids).
    pub fn accesses(&self) -> Vec<(String, Vec<String>)> {
        self.accesses.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, namespace: &str, id: &str) -> Option<(Vec<f32>, Metadata)> {
        self.entries
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), id.to_string()))
            .cloned()
    }

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if na == 0.0 || nb == 0.0 {
            0.0
        } else {
            dot / (na * nb)
        }
    }
}

fn matches_filter(metadata: &Metadata, filter: &Metadata) -> bool {
    filter.iter().all(|(k, v)| metadata.get(k) == Some(v))
}

#[async_trait]
impl IVectorStore for InMemoryVectorStore {
    async fn upsert(
        &self,
        namespace: &str,
        id: &str,
        vector: &[f32],
        metadata: &Metadata,
    ) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed {
                id: id.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        self.entries.lock().unwrap().insert(
            (namespace.to_string(), id.to_string()),
            (vector.to_vec(), metadata.clone()),
        );
        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        filter: &Metadata,
    ) -> Result<Vec<StoreMatch>, StoreError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                reason: "scripted failure".to_string(),
            });
        }
        if let Some(matches) = self.scripted.lock().unwrap().as_ref() {
            return Ok(matches
                .iter()
                .filter(|m| matches_filter(&m.metadata, filter))
                .take(top_k)
                .cloned()
                .collect());
        }

        let entries = self.entries.lock().unwrap();
        let mut hits: Vec<StoreMatch> = entries
            .iter()
            .filter(|((ns, _), (v, meta))| {
                ns == namespace && v.len() == vector.len() && matches_filter(meta, filter)
            })
            .map(|((_, id), (v, meta))| StoreMatch {
                id: id.clone(),
                score: Self::cosine(vector, v),
                metadata: meta.clone(),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn delete(&self, namespace: &str, id: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed {
                id: id.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        self.entries
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), id.to_string()));
        Ok(())
    }

    async fn describe_stats(&self, namespace: &str) -> Result<StoreStats, StoreError> {
        let entries = self.entries.lock().unwrap();
        let in_ns: Vec<_> = entries.iter().filter(|((ns, _), _)| ns == namespace).collect();
        Ok(StoreStats {
            namespace: namespace.to_string(),
            vector_count: in_ns.len(),
            dimensions: in_ns.first().map(|(_, (v, _))| v.len()),
        })
    }

    async fn record_access(
        &self,
        namespace: &str,
        ids: &[String],
        _at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.accesses
            .lock()
            .unwrap()
            .push((namespace.to_string(), ids.to_vec()));
        Ok(())
    }
}
