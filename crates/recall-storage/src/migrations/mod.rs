//! Schema migrations, tracked through `PRAGMA user_version`.

mod v001_vector_tables;

use rusqlite::Connection;
use tracing::info;

use recall_core::errors::StoreError;

use crate::to_storage_err;

type Migration = fn(&Connection) -> Result<(), StoreError>;

const MIGRATIONS: &[Migration] = &[v001_vector_tables::migrate];

/// Current schema version after all migrations.
pub const LATEST_VERSION: i64 = MIGRATIONS.len() as i64;

/// Apply every migration newer than the database's `user_version`.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let current: i64 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (i, migrate) in MIGRATIONS.iter().enumerate() {
        let version = i as i64 + 1;
        if version <= current {
            continue;
        }
        migrate(conn)?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| to_storage_err(e.to_string()))?;
        info!(version, "applied migration");
    }
    Ok(())
}

/// Read the schema version of an open database.
pub fn schema_version(conn: &Connection) -> Result<i64, StoreError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}
