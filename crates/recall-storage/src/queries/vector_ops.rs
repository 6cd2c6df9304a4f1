//! Vector CRUD and brute-force similarity search.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use recall_core::errors::StoreError;
use recall_core::models::{Metadata, StoreMatch, StoreStats};

use crate::to_storage_err;

/// Insert or replace the vector stored under (namespace, id).
/// Access bookkeeping survives a replace.
///
/// A namespace holds one dimension: a vector whose length differs from the
/// other rows of its namespace is rejected.
pub fn upsert_vector(
    conn: &Connection,
    namespace: &str,
    id: &str,
    vector: &[f32],
    metadata: &Metadata,
) -> Result<(), StoreError> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT dimensions FROM vectors WHERE namespace = ?1 AND id != ?2 LIMIT 1",
            params![namespace, id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| query_err(e.to_string()))?;
    if let Some(dims) = existing {
        ensure_dimensions(namespace, dims as usize, vector.len())?;
    }

    let blob = f32_vec_to_bytes(vector);
    let meta_json = serde_json::to_string(metadata).map_err(|e| StoreError::WriteFailed {
        id: id.to_string(),
        reason: e.to_string(),
    })?;

    conn.execute(
        "INSERT INTO vectors (namespace, id, vector, dimensions, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(namespace, id) DO UPDATE SET
            vector = excluded.vector,
            dimensions = excluded.dimensions,
            metadata = excluded.metadata",
        params![
            namespace,
            id,
            blob,
            vector.len() as i64,
            meta_json,
            Utc::now().to_rfc3339()
        ],
    )
    .map_err(|e| StoreError::WriteFailed {
        id: id.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Delete one vector. Deleting a missing id is not an error.
pub fn delete_vector(conn: &Connection, namespace: &str, id: &str) -> Result<(), StoreError> {
    conn.execute(
        "DELETE FROM vectors WHERE namespace = ?1 AND id = ?2",
        params![namespace, id],
    )
    .map_err(|e| StoreError::WriteFailed {
        id: id.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Search a namespace by cosine similarity.
///
/// A query whose length differs from the namespace's dimension fails with
/// `DimensionMismatch` before any score is computed. Rows whose metadata
/// lacks any `filter` entry are skipped. Scores are clamped to [0, 1].
pub fn search_vector(
    conn: &Connection,
    namespace: &str,
    query: &[f32],
    top_k: usize,
    filter: &Metadata,
) -> Result<Vec<StoreMatch>, StoreError> {
    if let Some(dims) = namespace_stats(conn, namespace)?.dimensions {
        ensure_dimensions(namespace, dims, query.len())?;
    }

    let query_norm_sq: f64 = query.iter().map(|x| (*x as f64) * (*x as f64)).sum();
    if query_norm_sq == 0.0 || top_k == 0 {
        return Ok(vec![]);
    }

    let mut stmt = conn
        .prepare("SELECT id, vector, dimensions, metadata FROM vectors WHERE namespace = ?1")
        .map_err(|e| query_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![namespace], |row| {
            let id: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            let dims: i64 = row.get(2)?;
            let meta: String = row.get(3)?;
            Ok((id, blob, dims, meta))
        })
        .map_err(|e| query_err(e.to_string()))?;

    let mut scored = Vec::new();
    for row in rows {
        let (id, blob, dims, meta) = row.map_err(|e| query_err(e.to_string()))?;
        ensure_dimensions(namespace, dims as usize, query.len())?;
        let metadata: Metadata = serde_json::from_str(&meta).map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            details: format!("metadata: {e}"),
        })?;
        if !filter.iter().all(|(k, v)| metadata.get(k) == Some(v)) {
            continue;
        }
        let stored = bytes_to_f32_vec(&id, &blob, dims as usize)?;
        let score = cosine_similarity(query, &stored).clamp(0.0, 1.0) as f32;
        scored.push(StoreMatch {
            id,
            score,
            metadata,
        });
    }

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    Ok(scored)
}

/// Vector count and dimensionality of a namespace.
pub fn namespace_stats(conn: &Connection, namespace: &str) -> Result<StoreStats, StoreError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM vectors WHERE namespace = ?1",
            params![namespace],
            |row| row.get(0),
        )
        .map_err(|e| query_err(e.to_string()))?;

    let dimensions: Option<i64> = conn
        .query_row(
            "SELECT dimensions FROM vectors WHERE namespace = ?1 LIMIT 1",
            params![namespace],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| query_err(e.to_string()))?;

    Ok(StoreStats {
        namespace: namespace.to_string(),
        vector_count: count as usize,
        dimensions: dimensions.map(|d| d as usize),
    })
}

/// Bump access_count and stamp last_accessed for each id.
pub fn record_access(
    conn: &Connection,
    namespace: &str,
    ids: &[String],
    at: DateTime<Utc>,
) -> Result<(), StoreError> {
    let at = at.to_rfc3339();
    let mut stmt = conn
        .prepare(
            "UPDATE vectors SET access_count = access_count + 1, last_accessed = ?3
             WHERE namespace = ?1 AND id = ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    for id in ids {
        stmt.execute(params![namespace, id, at])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// Access count and last access time of one vector.
pub fn access_info(
    conn: &Connection,
    namespace: &str,
    id: &str,
) -> Result<Option<(u64, Option<String>)>, StoreError> {
    conn.query_row(
        "SELECT access_count, last_accessed FROM vectors WHERE namespace = ?1 AND id = ?2",
        params![namespace, id],
        |row| {
            let count: i64 = row.get(0)?;
            let last: Option<String> = row.get(1)?;
            Ok((count as u64, last))
        },
    )
    .optional()
    .map_err(|e| query_err(e.to_string()))
}

fn ensure_dimensions(namespace: &str, expected: usize, actual: usize) -> Result<(), StoreError> {
    if expected == actual {
        Ok(())
    } else {
        Err(StoreError::DimensionMismatch {
            namespace: namespace.to_string(),
            expected,
            actual,
        })
    }
}

fn query_err(reason: String) -> StoreError {
    StoreError::QueryFailed { reason }
}

/// Convert f32 slice to bytes (little-endian).
fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to an f32 vec, checking the declared dimension.
fn bytes_to_f32_vec(id: &str, bytes: &[u8], expected_dims: usize) -> Result<Vec<f32>, StoreError> {
    if bytes.len() != expected_dims * 4 {
        return Err(StoreError::Corrupt {
            id: id.to_string(),
            details: format!("{} bytes for {} dimensions", bytes.len(), expected_dims),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
