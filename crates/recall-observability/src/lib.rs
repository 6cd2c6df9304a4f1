//! # recall-observability
//!
//! Structured tracing setup and degradation event tracking. Every
//! fallback taken by the embedding and retrieval crates lands in a
//! shared [`DegradationTracker`].

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
