//! Fire-and-forget access bookkeeping.
//!
//! Searches hand the ids they returned to a bounded channel; a background
//! task drains it into `IVectorStore::record_access`. Nothing on this path
//! can fail or slow down the search that produced the ids.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use recall_core::traits::IVectorStore;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Pending notifications beyond this are dropped.
const QUEUE_CAPACITY: usize = 256;

#[derive(Debug)]
struct AccessBatch {
    namespace: String,
    ids: Vec<String>,
    at: DateTime<Utc>,
}

/// Sender half of the access side channel. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct AccessNotifier {
    tx: Option<mpsc::Sender<AccessBatch>>,
}

impl AccessNotifier {
    /// Start the background drain task on the current tokio runtime.
    ///
    /// Outside a runtime the notifier is returned disabled.
    pub fn spawn(store: Arc<dyn IVectorStore>) -> Self {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no tokio runtime, access tracking disabled");
            return Self::disabled();
        };

        let (tx, mut rx) = mpsc::channel::<AccessBatch>(QUEUE_CAPACITY);
        handle.spawn(async move {
            while let Some(batch) = rx.recv().await {
                if let Err(e) = store
                    .record_access(&batch.namespace, &batch.ids, batch.at)
                    .await
                {
                    warn!(
                        namespace = %batch.namespace,
                        count = batch.ids.len(),
                        error = %e,
                        "failed to record access"
                    );
                }
            }
            debug!("access notifier closed");
        });

        Self { tx: Some(tx) }
    }

    /// A notifier that drops everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue an access update. Never blocks, never fails.
    pub fn notify(&self, namespace: &str, ids: Vec<String>) {
        let Some(tx) = &self.tx else {
            return;
        };
        if ids.is_empty() {
            return;
        }
        let batch = AccessBatch {
            namespace: namespace.to_string(),
            ids,
            at: Utc::now(),
        };
        if let Err(e) = tx.try_send(batch) {
            debug!(error = %e, "access notification dropped");
        }
    }
}
