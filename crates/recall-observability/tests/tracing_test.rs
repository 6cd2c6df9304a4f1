//! Subscriber setup is idempotent and events log without panicking.

use recall_core::config::ObservabilityConfig;
use recall_core::models::DegradationEvent;
use recall_observability::tracing_setup::{self, events};
use recall_observability::DegradationTracker;

#[test]
fn repeated_initialization_is_harmless() {
    tracing_setup::init_tracing_with_filter("debug");
    tracing_setup::init_from_config(&ObservabilityConfig {
        log_level: "warn".to_string(),
        json: false,
    });
    tracing_setup::init_tracing();

    events::context_truncated(900, 500);
    events::document_processed("doc-1", 3, 3);
}

#[test]
fn tracker_logs_degradation_and_recovery() {
    tracing_setup::init_tracing_with_filter("debug");
    let tracker = DegradationTracker::new();
    tracker.record(DegradationEvent::now("reranker", "timeout", "neutral-relevance"));
    assert!(tracker.is_degraded("reranker"));
    tracker.mark_recovered("reranker");
    assert!(!tracker.is_degraded("reranker"));
    assert_eq!(tracker.drain().len(), 1);
    assert!(tracker.is_empty());
}
