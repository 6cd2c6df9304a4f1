//! SqliteVectorStore behaviour: namespaces, filters, scores, persistence,
//! access bookkeeping.

use chrono::Utc;
use recall_core::errors::StoreError;
use recall_core::models::Metadata;
use recall_core::traits::IVectorStore;
use recall_storage::{migrations, pragmas, SqliteVectorStore};
use serde_json::json;

fn meta(value: serde_json::Value) -> Metadata {
    value.as_object().cloned().unwrap_or_default()
}

// ── Query semantics ───────────────────────────────────────────────────────

#[tokio::test]
async fn query_orders_by_descending_score() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    store.upsert("ns", "a", &[1.0, 0.0], &Metadata::new()).await.unwrap();
    store.upsert("ns", "b", &[0.6, 0.8], &Metadata::new()).await.unwrap();
    store.upsert("ns", "c", &[0.0, 1.0], &Metadata::new()).await.unwrap();

    let hits = store.query("ns", &[1.0, 0.0], 10, &Metadata::new()).await.unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!((hits[0].score - 1.0).abs() < 1e-6);
    assert!((hits[1].score - 0.6).abs() < 1e-6);
}

#[tokio::test]
async fn negative_similarity_is_clamped_to_zero() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    store.upsert("ns", "opposite", &[-1.0, 0.0], &Metadata::new()).await.unwrap();

    let hits = store.query("ns", &[1.0, 0.0], 5, &Metadata::new()).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score, 0.0);
}

#[tokio::test]
async fn top_k_limits_results() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    for i in 0..10 {
        store
            .upsert("ns", &format!("v{i}"), &[1.0, i as f32], &Metadata::new())
            .await
            .unwrap();
    }
    let hits = store.query("ns", &[1.0, 0.0], 3, &Metadata::new()).await.unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].id, "v0");
}

#[tokio::test]
async fn namespaces_are_isolated() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    store.upsert("one", "x", &[1.0, 0.0], &Metadata::new()).await.unwrap();
    store.upsert("two", "y", &[1.0, 0.0], &Metadata::new()).await.unwrap();

    let hits = store.query("one", &[1.0, 0.0], 10, &Metadata::new()).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "x");
}

#[tokio::test]
async fn filter_requires_every_entry_to_match() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    store
        .upsert("ns", "note", &[1.0, 0.0], &meta(json!({"source_type": "note", "lang": "en"})))
        .await
        .unwrap();
    store
        .upsert("ns", "doc", &[1.0, 0.0], &meta(json!({"source_type": "document", "lang": "en"})))
        .await
        .unwrap();

    let filter = meta(json!({"source_type": "note"}));
    let hits = store.query("ns", &[1.0, 0.0], 10, &filter).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "note");
    assert_eq!(hits[0].metadata["lang"], json!("en"));

    let filter = meta(json!({"source_type": "note", "lang": "de"}));
    assert!(store.query("ns", &[1.0, 0.0], 10, &filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn query_of_another_dimension_is_rejected() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    store.upsert("ns", "three", &[1.0, 0.0, 0.0], &Metadata::new()).await.unwrap();

    let err = store.query("ns", &[1.0, 0.0], 10, &Metadata::new()).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::DimensionMismatch { expected: 3, actual: 2, .. }
    ));
    // Zero vectors of the wrong size are rejected too.
    assert!(store.query("ns", &[0.0; 4], 10, &Metadata::new()).await.is_err());
}

#[tokio::test]
async fn upsert_of_another_dimension_is_rejected() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    store.upsert("ns", "three", &[1.0, 0.0, 0.0], &Metadata::new()).await.unwrap();

    let err = store.upsert("ns", "two", &[1.0, 0.0], &Metadata::new()).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::DimensionMismatch { expected: 3, actual: 2, .. }
    ));
    // Other namespaces keep their own dimension.
    store.upsert("other", "two", &[1.0, 0.0], &Metadata::new()).await.unwrap();
    // The only row of a namespace may be replaced at a new size.
    store.upsert("ns", "three", &[1.0, 0.0], &Metadata::new()).await.unwrap();
    assert_eq!(store.describe_stats("ns").await.unwrap().dimensions, Some(2));
}

#[tokio::test]
async fn zero_query_returns_nothing() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    store.upsert("ns", "a", &[1.0, 0.0], &Metadata::new()).await.unwrap();
    assert!(store.query("ns", &[0.0, 0.0], 5, &Metadata::new()).await.unwrap().is_empty());
}

// ── Writes ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_replaces_and_delete_removes() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    store.upsert("ns", "a", &[1.0, 0.0], &meta(json!({"v": 1}))).await.unwrap();
    store.upsert("ns", "a", &[0.0, 1.0], &meta(json!({"v": 2}))).await.unwrap();

    let stats = store.describe_stats("ns").await.unwrap();
    assert_eq!(stats.vector_count, 1);
    assert_eq!(stats.dimensions, Some(2));

    let hits = store.query("ns", &[0.0, 1.0], 1, &Metadata::new()).await.unwrap();
    assert_eq!(hits[0].metadata["v"], json!(2));

    store.delete("ns", "a").await.unwrap();
    store.delete("ns", "missing").await.unwrap();
    let stats = store.describe_stats("ns").await.unwrap();
    assert_eq!(stats.vector_count, 0);
    assert_eq!(stats.dimensions, None);
}

#[tokio::test]
async fn record_access_bumps_counters() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    store.upsert("ns", "a", &[1.0, 0.0], &Metadata::new()).await.unwrap();
    assert_eq!(store.access_info("ns", "a").unwrap(), Some((0, None)));

    let ids = vec!["a".to_string(), "ghost".to_string()];
    store.record_access("ns", &ids, Utc::now()).await.unwrap();
    store.record_access("ns", &ids, Utc::now()).await.unwrap();

    let (count, last) = store.access_info("ns", "a").unwrap().unwrap();
    assert_eq!(count, 2);
    assert!(last.is_some());
    assert_eq!(store.access_info("ns", "ghost").unwrap(), None);
}

#[tokio::test]
async fn corrupt_blob_is_reported() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    store.upsert("ns", "a", &[1.0, 0.0], &Metadata::new()).await.unwrap();
    store
        .with_conn(|conn| {
            conn.execute("UPDATE vectors SET vector = x'0000' WHERE id = 'a'", [])
                .map_err(|e| StoreError::Sqlite { message: e.to_string() })?;
            Ok(())
        })
        .unwrap();

    let err = store.query("ns", &[1.0, 0.0], 5, &Metadata::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

// ── Persistence ───────────────────────────────────────────────────────────

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vectors.db");

    {
        let store = SqliteVectorStore::open(&path).unwrap();
        store.upsert("ns", "kept", &[0.3, 0.4], &meta(json!({"content": "hello"}))).await.unwrap();
    }

    let store = SqliteVectorStore::open(&path).unwrap();
    let hits = store.query("ns", &[0.3, 0.4], 5, &Metadata::new()).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].metadata["content"], json!("hello"));

    let version = store.with_conn(migrations::schema_version).unwrap();
    assert_eq!(version, migrations::LATEST_VERSION);
    assert_eq!(store.with_conn(pragmas::journal_mode).unwrap(), "wal");
}

#[tokio::test]
async fn in_memory_store_keeps_memory_journal() {
    let store = SqliteVectorStore::open_in_memory().unwrap();
    assert_eq!(store.with_conn(pragmas::journal_mode).unwrap(), "memory");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_queries_share_one_connection() {
    let store = std::sync::Arc::new(SqliteVectorStore::open_in_memory().unwrap());
    for i in 0..20 {
        store
            .upsert("ns", &format!("v{i}"), &[1.0, i as f32], &Metadata::new())
            .await
            .unwrap();
    }
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.query("ns", &[1.0, 0.0], 5, &Metadata::new()).await })
        })
        .collect();
    for task in tasks {
        let hits = task.await.unwrap().unwrap();
        assert_eq!(hits.len(), 5);
        assert_eq!(hits[0].id, "v0");
    }
}
