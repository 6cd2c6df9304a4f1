use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::StoreError;
use crate::models::{Metadata, StoreMatch, StoreStats};

/// Nearest-neighbour vector store, partitioned by namespace.
#[async_trait]
pub trait IVectorStore: Send + Sync {
    async fn upsert(
        &self,
        namespace: &str,
        id: &str,
        vector: &[f32],
        metadata: &Metadata,
    ) -> Result<(), StoreError>;

    /// Return up to `top_k` matches whose metadata contains every `filter`
    /// entry, ordered by descending score.
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        filter: &Metadata,
    ) -> Result<Vec<StoreMatch>, StoreError>;

    async fn delete(&self, namespace: &str, id: &str) -> Result<(), StoreError>;

    async fn describe_stats(&self, namespace: &str) -> Result<StoreStats, StoreError>;

    /// Bump access counters for the given ids. Best-effort bookkeeping.
    async fn record_access(
        &self,
        namespace: &str,
        ids: &[String],
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
