use serde::{Deserialize, Serialize};

use super::defaults;

/// Vector store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Logical partition all reads and writes are scoped to.
    pub namespace: String,
    /// SQLite database path. `None` opens an in-memory store.
    pub db_path: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: defaults::DEFAULT_NAMESPACE.to_string(),
            db_path: None,
        }
    }
}
