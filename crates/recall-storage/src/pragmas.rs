//! Connection pragmas.
//!
//! File-backed stores run in WAL mode so readers never block the writer;
//! in-memory stores keep SQLite's `memory` journal.

use rusqlite::Connection;
use tracing::warn;

use recall_core::errors::StoreError;

use crate::to_storage_err;

/// Configure a freshly opened connection.
///
/// Returns the journal mode SQLite settled on.
pub fn apply_pragmas(conn: &Connection, file_backed: bool) -> Result<String, StoreError> {
    conn.pragma_update(None, "synchronous", "NORMAL")
        .and_then(|_| conn.pragma_update(None, "busy_timeout", 5000))
        .and_then(|_| conn.pragma_update(None, "cache_size", -16000))
        .map_err(|e| to_storage_err(e.to_string()))?;

    if !file_backed {
        return journal_mode(conn);
    }

    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    if !mode.eq_ignore_ascii_case("wal") {
        warn!(mode = %mode, "WAL journal unavailable, continuing with fallback journal");
    }
    Ok(mode)
}

/// Current journal mode of a connection, lowercased.
pub fn journal_mode(conn: &Connection) -> Result<String, StoreError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.to_ascii_lowercase())
}
