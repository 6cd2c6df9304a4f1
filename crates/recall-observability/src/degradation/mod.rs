//! Degradation tracking subsystem.

pub mod tracker;

pub use tracker::{
    DegradationTracker, RecoveryStatus, TrackedDegradation, DEFAULT_TRACKER_CAPACITY,
};
