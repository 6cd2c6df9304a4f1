//! v001: chunk vectors keyed by (namespace, id).

use rusqlite::Connection;

use recall_core::errors::StoreError;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS vectors (
            namespace     TEXT NOT NULL,
            id            TEXT NOT NULL,
            vector        BLOB NOT NULL,
            dimensions    INTEGER NOT NULL,
            metadata      TEXT NOT NULL DEFAULT '{}',
            access_count  INTEGER NOT NULL DEFAULT 0,
            last_accessed TEXT,
            created_at    TEXT NOT NULL,
            PRIMARY KEY (namespace, id)
        );

        CREATE INDEX IF NOT EXISTS idx_vectors_namespace ON vectors(namespace);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
