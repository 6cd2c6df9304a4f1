//! Record every degradation event: component, failure mode, fallback used, timestamp, recovery status.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use recall_core::models::DegradationEvent;
use serde::{Deserialize, Serialize};

/// Events kept before the oldest are evicted.
pub const DEFAULT_TRACKER_CAPACITY: usize = 1024;

/// Recovery status of a degradation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// Still in degraded mode.
    Active,
    /// Recovered to normal operation.
    Recovered,
}

/// A tracked degradation event with recovery status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Ring {
    events: VecDeque<TrackedDegradation>,
    active: usize,
}

/// Tracks degradation events across concurrent requests.
///
/// Shared as `Arc<DegradationTracker>` between the embedder, reranker and
/// hybrid retriever. Recording never fails the caller. The buffer is a ring
/// of at most `capacity` events; the oldest is evicted first.
#[derive(Debug)]
pub struct DegradationTracker {
    ring: Mutex<Ring>,
    capacity: usize,
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TRACKER_CAPACITY)
    }
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker holding at most `capacity` events (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ring: Mutex::new(Ring::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, Ring> {
        // A panic while holding the lock leaves a valid ring behind.
        self.ring.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a new degradation event.
    pub fn record(&self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        let mut ring = self.lock();
        if ring.events.len() >= self.capacity {
            if let Some(evicted) = ring.events.pop_front() {
                if evicted.recovery_status == RecoveryStatus::Active {
                    ring.active -= 1;
                }
            }
        }
        ring.events.push_back(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
        ring.active += 1;
    }

    /// Mark every active degradation of a component as recovered.
    ///
    /// Returns immediately when nothing is active, which is the steady state
    /// of a healthy provider.
    pub fn mark_recovered(&self, component: &str) {
        let mut ring = self.lock();
        if ring.active == 0 {
            return;
        }
        let now = Utc::now();
        let mut recovered = 0;
        for tracked in ring.events.iter_mut() {
            if tracked.event.component == component
                && tracked.recovery_status == RecoveryStatus::Active
            {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(now);
                recovered += 1;
            }
        }
        ring.active -= recovered;
        drop(ring);
        if recovered > 0 {
            crate::tracing_setup::events::degradation_recovered(component);
        }
    }

    /// Whether a component currently has an unrecovered degradation.
    pub fn is_degraded(&self, component: &str) -> bool {
        self.lock().events.iter().any(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        })
    }

    /// Snapshot of all tracked events, oldest first.
    pub fn events(&self) -> Vec<TrackedDegradation> {
        self.lock().events.iter().cloned().collect()
    }

    /// Get active (unrecovered) degradations.
    pub fn active_degradations(&self) -> Vec<TrackedDegradation> {
        self.lock()
            .events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .cloned()
            .collect()
    }

    /// Count events in the last N seconds for a given component.
    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(window_secs);
        self.lock()
            .events
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > cutoff)
            .count()
    }

    /// Drain accumulated events.
    pub fn drain(&self) -> Vec<DegradationEvent> {
        let mut ring = self.lock();
        ring.active = 0;
        ring.events.drain(..).map(|t| t.event).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
