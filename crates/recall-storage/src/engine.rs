//! SqliteVectorStore: owns one connection, implements IVectorStore.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, info};

use recall_core::config::StoreConfig;
use recall_core::errors::StoreError;
use recall_core::models::{Metadata, StoreMatch, StoreStats};
use recall_core::traits::IVectorStore;

use crate::migrations;
use crate::pragmas;
use crate::queries::vector_ops;
use crate::to_storage_err;

/// SQLite-backed vector store.
///
/// All statements run on a single connection behind a mutex. The async
/// trait methods move each statement onto tokio's blocking pool, so a long
/// scan never stalls a runtime worker.
pub struct SqliteVectorStore {
    conn: Arc<Mutex<Connection>>,
    db_path: Option<PathBuf>,
}

impl SqliteVectorStore {
    /// Open a store backed by a file on disk, creating it if needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Unavailable {
            reason: format!("{}: {e}", path.display()),
        })?;
        let store = Self::initialize(conn, Some(path.to_path_buf()))?;
        info!(path = %path.display(), "vector store opened");
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Unavailable {
            reason: e.to_string(),
        })?;
        Self::initialize(conn, None)
    }

    /// Open the store named by `config.db_path`, or an in-memory one.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        match &config.db_path {
            Some(path) => Self::open(Path::new(path)),
            None => Self::open_in_memory(),
        }
    }

    fn initialize(conn: Connection, db_path: Option<PathBuf>) -> Result<Self, StoreError> {
        let journal = pragmas::apply_pragmas(&conn, db_path.is_some())?;
        migrations::run_migrations(&conn)?;
        debug!(journal = %journal, "vector store initialized");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Run a closure against the connection on the calling thread.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        locked(&self.conn, f)
    }

    /// Run a closure against the connection on the blocking pool.
    async fn run<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || locked(&conn, f))
            .await
            .map_err(|e| to_storage_err(format!("blocking store task failed: {e}")))?
    }

    /// Access count and RFC 3339 last-access time of one vector.
    pub fn access_info(
        &self,
        namespace: &str,
        id: &str,
    ) -> Result<Option<(u64, Option<String>)>, StoreError> {
        self.with_conn(|conn| vector_ops::access_info(conn, namespace, id))
    }
}

fn locked<F, T>(conn: &Mutex<Connection>, f: F) -> Result<T, StoreError>
where
    F: FnOnce(&Connection) -> Result<T, StoreError>,
{
    let conn = conn
        .lock()
        .map_err(|_| to_storage_err("connection mutex poisoned"))?;
    f(&conn)
}

#[async_trait]
impl IVectorStore for SqliteVectorStore {
    async fn upsert(
        &self,
        namespace: &str,
        id: &str,
        vector: &[f32],
        metadata: &Metadata,
    ) -> Result<(), StoreError> {
        let (namespace, id) = (namespace.to_string(), id.to_string());
        let (vector, metadata) = (vector.to_vec(), metadata.clone());
        self.run(move |conn| vector_ops::upsert_vector(conn, &namespace, &id, &vector, &metadata))
            .await
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        filter: &Metadata,
    ) -> Result<Vec<StoreMatch>, StoreError> {
        let (ns, query, filter) = (namespace.to_string(), vector.to_vec(), filter.clone());
        let matches = self
            .run(move |conn| vector_ops::search_vector(conn, &ns, &query, top_k, &filter))
            .await?;
        debug!(namespace, matches = matches.len(), top_k, "vector query");
        Ok(matches)
    }

    async fn delete(&self, namespace: &str, id: &str) -> Result<(), StoreError> {
        let (namespace, id) = (namespace.to_string(), id.to_string());
        self.run(move |conn| vector_ops::delete_vector(conn, &namespace, &id))
            .await
    }

    async fn describe_stats(&self, namespace: &str) -> Result<StoreStats, StoreError> {
        let namespace = namespace.to_string();
        self.run(move |conn| vector_ops::namespace_stats(conn, &namespace))
            .await
    }

    async fn record_access(
        &self,
        namespace: &str,
        ids: &[String],
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let (namespace, ids) = (namespace.to_string(), ids.to_vec());
        self.run(move |conn| vector_ops::record_access(conn, &namespace, &ids, at))
            .await
    }
}
