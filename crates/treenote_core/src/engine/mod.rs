//! Document engine contract and implementations.
//!
//! # Responsibility
//! - Define the flat key/document primitives the store is built on:
//!   get, put, remove, half-open range scan, destroy.
//! - Keep storage details (SQLite rows, in-memory maps) behind one trait.
//!
//! # Invariants
//! - `get`/`remove` on an absent key fail with `EngineError::NotFound`.
//! - `range_scan(start, end)` returns keys with `start <= key < end` in
//!   ascending UTF-8 byte order.
//! - A reader observes a whole document, never a partially written one.
//! - After `destroy`, every call fails with `EngineError::Destroyed`.
//!
//! The engine knows nothing about trees; parent checks and cascades live in
//! `store`.

mod memory;
mod sqlite;

pub use memory::MemoryEngine;
pub use sqlite::SqliteEngine;

use crate::codec::{folder_range, note_range};
use crate::db::DbError;
use crate::model::document::Document;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by document engines.
#[derive(Debug)]
pub enum EngineError {
    /// No document is stored under the key.
    NotFound(String),
    /// SQLite bootstrap or query failure.
    Db(DbError),
    /// Filesystem failure outside SQLite (e.g. removing database files).
    Io(std::io::Error),
    /// Document body could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// Persisted data is structurally invalid.
    InvalidData(String),
    /// The engine was destroyed and can no longer be used.
    Destroyed,
    /// A blocking storage task panicked or was cancelled.
    Join(tokio::task::JoinError),
    /// A previous storage task panicked while holding the connection.
    Poisoned,
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "document not found: {key}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid document encoding: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
            Self::Destroyed => write!(f, "document store has been destroyed"),
            Self::Join(err) => write!(f, "storage task failed: {err}"),
            Self::Poisoned => write!(f, "storage connection lock is poisoned"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Join(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Destroyed | Self::Poisoned => None,
        }
    }
}

impl From<DbError> for EngineError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Flat, key-ordered document storage.
#[async_trait]
pub trait DocumentEngine: Send + Sync {
    /// Short backend label used in log events.
    fn backend(&self) -> &'static str;
    /// Loads the document stored under `key`.
    async fn get(&self, key: &str) -> EngineResult<Document>;
    /// Inserts or replaces the document under its derived key.
    async fn put(&self, document: &Document) -> EngineResult<()>;
    /// Deletes the document stored under `key`.
    async fn remove(&self, key: &str) -> EngineResult<()>;
    /// Lists documents with `start <= key < end`, ascending by key.
    /// Empty when `start >= end`.
    async fn range_scan(&self, start: &str, end: &str) -> EngineResult<Vec<Document>>;
    /// Irrecoverably deletes all stored data.
    async fn destroy(&self) -> EngineResult<()>;

    /// Lists every stored document in key order.
    ///
    /// Folder keys sort before note keys, so the two namespace scans
    /// concatenate in key order.
    async fn all_documents(&self) -> EngineResult<Vec<Document>> {
        let (folder_start, folder_end) = folder_range();
        let (note_start, note_end) = note_range();
        let mut documents = self.range_scan(&folder_start, &folder_end).await?;
        documents.extend(self.range_scan(&note_start, &note_end).await?);
        Ok(documents)
    }
}
