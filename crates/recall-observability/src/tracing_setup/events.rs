//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a fallback taken by a component.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "component degraded"
    );
}

/// Log a component returning to normal operation.
pub fn degradation_recovered(component: &str) {
    tracing::info!(
        event = "degradation_recovered",
        component = %component,
        "component recovered"
    );
}

/// Log a context truncated to fit its token budget.
pub fn context_truncated(estimated_tokens: usize, max_tokens: usize) {
    tracing::warn!(
        event = "context_truncated",
        estimated_tokens,
        max_tokens,
        "assembled context exceeded token budget, truncating"
    );
}

/// Log a completed document ingestion.
pub fn document_processed(source_id: &str, chunks: usize, stored: usize) {
    tracing::info!(
        event = "document_processed",
        source_id = %source_id,
        chunks,
        stored,
        "document processed"
    );
}
