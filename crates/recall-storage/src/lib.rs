//! # recall-storage
//!
//! SQLite persistence for embedded chunks. Implements [`IVectorStore`]
//! with a brute-force cosine scan, which is fine for the corpus sizes a
//! single process holds.
//!
//! [`IVectorStore`]: recall_core::traits::IVectorStore

pub mod engine;
pub mod migrations;
pub mod pragmas;
pub mod queries;

pub use engine::SqliteVectorStore;

use recall_core::errors::StoreError;

/// Helper to convert a rusqlite error string into a StoreError.
pub(crate) fn to_storage_err(msg: impl Into<String>) -> StoreError {
    StoreError::Sqlite {
        message: msg.into(),
    }
}
