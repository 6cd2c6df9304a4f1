//! SimilaritySearch and Reranker behaviour against scripted collaborators.

use std::sync::Arc;
use std::time::Duration;

use recall_core::config::EmbeddingConfig;
use recall_core::errors::{RecallError, RetrievalError, StoreError};
use recall_core::models::{Metadata, StoreMatch};
use recall_core::traits::IVectorStore;
use recall_embeddings::Embedder;
use recall_retrieval::{AccessNotifier, Reranker, SimilaritySearch};
use serde_json::json;
use test_fixtures::{metadata, Behavior, InMemoryVectorStore, ScriptedRerankProvider};

fn embedder() -> Arc<Embedder> {
    Arc::new(Embedder::offline(EmbeddingConfig {
        dimensions: 64,
        ..Default::default()
    }))
}

fn hit(id: &str, score: f32, content: &str) -> StoreMatch {
    StoreMatch {
        id: id.to_string(),
        score,
        metadata: metadata(&[("content", content), ("source_id", id)]),
    }
}

// ── Similarity search ─────────────────────────────────────────────────────

#[tokio::test]
async fn threshold_drops_low_scores() {
    let store = Arc::new(InMemoryVectorStore::scripted(vec![
        hit("high", 0.9, "relevant passage"),
        hit("low", 0.5, "weak passage"),
    ]));
    let search = SimilaritySearch::new(embedder(), store, "default");

    let results = search.search("anything", 5, &Metadata::new(), 0.7).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "high");
    assert_eq!(results[0].score, 0.9);
    assert_eq!(results[0].content, "relevant passage");
}

#[tokio::test]
async fn threshold_is_inclusive() {
    let store = Arc::new(InMemoryVectorStore::scripted(vec![hit("edge", 0.7, "x")]));
    let search = SimilaritySearch::new(embedder(), store, "default");
    assert_eq!(search.search("q", 5, &Metadata::new(), 0.7).await.unwrap().len(), 1);
}

#[tokio::test]
async fn filter_is_forwarded_to_store() {
    let embedder = embedder();
    let store = Arc::new(InMemoryVectorStore::new());
    let text = "filtered passage about caching";
    let vector = embedder.embed_query(text).await.unwrap();
    let mut note = metadata(&[("content", text), ("source_type", "note")]);
    store.upsert("default", "n:0", &vector, &note).await.unwrap();
    note.insert("source_type".to_string(), json!("recipe"));
    store.upsert("default", "r:0", &vector, &note).await.unwrap();

    let search = SimilaritySearch::new(embedder, store, "default");
    let filter = metadata(&[("source_type", "note")]);
    let results = search.search(text, 5, &filter, 0.5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "n:0");
}

#[tokio::test]
async fn empty_query_fails_fast() {
    let search = SimilaritySearch::new(embedder(), Arc::new(InMemoryVectorStore::new()), "default");
    let err = search.search("  ", 5, &Metadata::new(), 0.0).await.unwrap_err();
    assert!(matches!(err, RecallError::Retrieval(RetrievalError::EmptyQuery)));
}

#[tokio::test]
async fn store_failure_propagates() {
    let store = Arc::new(InMemoryVectorStore::new());
    store.set_fail_queries(true);
    let search = SimilaritySearch::new(embedder(), store, "default");
    let err = search.search("q", 5, &Metadata::new(), 0.0).await.unwrap_err();
    assert!(matches!(err, RecallError::Store(StoreError::Unavailable { .. })));
}

#[tokio::test]
async fn returned_ids_are_reported_as_accessed() {
    let store = Arc::new(InMemoryVectorStore::scripted(vec![
        hit("a", 0.95, "one"),
        hit("b", 0.85, "two"),
        hit("c", 0.1, "three"),
    ]));
    let notifier = AccessNotifier::spawn(store.clone());
    assert!(notifier.is_enabled());
    let search = SimilaritySearch::new(embedder(), store.clone(), "default").with_notifier(notifier);

    search.search("q", 5, &Metadata::new(), 0.7).await.unwrap();

    let mut accesses = Vec::new();
    for _ in 0..100 {
        accesses = store.accesses();
        if !accesses.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(
        accesses,
        vec![("default".to_string(), vec!["a".to_string(), "b".to_string()])]
    );
}

// ── Reranker ──────────────────────────────────────────────────────────────

fn docs(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("document {i}")).collect()
}

#[tokio::test]
async fn provider_failure_returns_neutral_scores_in_order() {
    let reranker = Reranker::new(Arc::new(ScriptedRerankProvider::failing()), Duration::from_secs(1));
    let results = reranker.rerank("q", &docs(4), 4).await;

    assert_eq!(results.len(), 4);
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.index, i);
        assert_eq!(r.relevance_score, 0.5);
    }
    assert!(reranker.is_enabled());
}

#[tokio::test]
async fn provider_timeout_degrades_like_failure() {
    let provider = ScriptedRerankProvider::new(vec![0.9, 0.1])
        .with_behavior(Behavior::Stall(Duration::from_secs(5)));
    let reranker = Reranker::new(Arc::new(provider), Duration::from_millis(50));

    let results = reranker.rerank("q", &docs(2), 2).await;
    assert_eq!(results, Reranker::neutral(2));
}

#[tokio::test]
async fn successful_rerank_orders_by_relevance() {
    let provider = ScriptedRerankProvider::new(vec![0.2, 0.9, 0.6]);
    let reranker = Reranker::new(Arc::new(provider), Duration::from_secs(1));

    let results = reranker.rerank("q", &docs(3), 2).await;
    let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2]);
}

#[tokio::test]
async fn rerank_scores_are_clamped() {
    let provider = ScriptedRerankProvider::new(vec![3.5, -1.0]);
    let reranker = Reranker::new(Arc::new(provider), Duration::from_secs(1));
    let results = reranker.try_rerank("q", &docs(2), 2).await.unwrap();
    assert_eq!(results[0].relevance_score, 1.0);
    assert_eq!(results[1].relevance_score, 0.0);
}
