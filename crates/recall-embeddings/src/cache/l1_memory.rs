//! L1 in-memory cache using moka.
//!
//! TinyLFU admission policy, size-aware eviction, per-entry TTL.

use std::time::Duration;

use moka::sync::Cache;
use recall_core::traits::EmbedMode;

/// L1 in-memory embedding cache.
///
/// Keys are blake3 hashes of the embed mode and text. Values are embedding vectors.
pub struct L1MemoryCache {
    cache: Cache<String, Vec<f32>>,
}

impl L1MemoryCache {
    /// Create a new L1 cache with the given max entry count.
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600)) // 1 hour idle TTL
            .time_to_live(Duration::from_secs(86400)) // 24 hour max TTL
            .build();

        Self { cache }
    }

    /// Cache key for a text embedded in the given mode.
    pub fn key(text: &str, mode: EmbedMode) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(mode.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(text.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>) {
        self.cache.insert(key, embedding);
    }

    /// Number of entries currently in the cache.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invalidate all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
