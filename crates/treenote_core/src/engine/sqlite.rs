//! SQLite-backed persistent engine.
//!
//! # Responsibility
//! - Persist one JSON-encoded document per row in `documents`.
//! - Run blocking SQLite work off the async executor.
//!
//! # Invariants
//! - `documents.doc_key` always equals the key derived from `body`.
//! - Range scans compare keys with SQLite's BINARY collation, which matches
//!   Rust `str` ordering.

use super::{DocumentEngine, EngineError, EngineResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::document::Document;
use async_trait::async_trait;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Persistent engine over one SQLite connection.
///
/// The connection slot becomes `None` after `destroy`.
pub struct SqliteEngine {
    conn: Arc<Mutex<Option<Connection>>>,
    location: Option<PathBuf>,
}

impl SqliteEngine {
    /// Opens (or creates) a database file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_db(&path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            location: Some(path),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> EngineResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            location: None,
        })
    }

    /// Database file path; `None` for in-memory engines.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    async fn with_conn<T, F>(&self, op: F) -> EngineResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> EngineResult<T> + Send + 'static,
    {
        let slot = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = slot.lock().map_err(|_| EngineError::Poisoned)?;
            let conn = guard.as_ref().ok_or(EngineError::Destroyed)?;
            op(conn)
        })
        .await
        .map_err(EngineError::Join)?
    }
}

#[async_trait]
impl DocumentEngine for SqliteEngine {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> EngineResult<Document> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let body: Option<String> = conn
                .query_row(
                    "SELECT body FROM documents WHERE doc_key = ?1;",
                    [key.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            match body {
                Some(body) => decode_document(&key, &body),
                None => Err(EngineError::NotFound(key)),
            }
        })
        .await
    }

    async fn put(&self, document: &Document) -> EngineResult<()> {
        let key = document.key();
        let kind = document.kind().as_str();
        let updated_at = document.updated_at();
        let body = serde_json::to_string(document)?;
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO documents (doc_key, kind, body, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(doc_key) DO UPDATE SET
                    kind = excluded.kind,
                    body = excluded.body,
                    updated_at = excluded.updated_at;",
                params![key, kind, body, updated_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> EngineResult<()> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let changed =
                conn.execute("DELETE FROM documents WHERE doc_key = ?1;", [key.as_str()])?;
            if changed == 0 {
                return Err(EngineError::NotFound(key));
            }
            Ok(())
        })
        .await
    }

    async fn range_scan(&self, start: &str, end: &str) -> EngineResult<Vec<Document>> {
        let start = start.to_string();
        let end = end.to_string();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT doc_key, body
                 FROM documents
                 WHERE doc_key >= ?1
                   AND doc_key < ?2
                 ORDER BY doc_key ASC;",
            )?;
            let mut rows = stmt.query(params![start, end])?;
            let mut documents = Vec::new();
            while let Some(row) = rows.next()? {
                let key: String = row.get(0)?;
                let body: String = row.get(1)?;
                documents.push(decode_document(&key, &body)?);
            }
            Ok(documents)
        })
        .await
    }

    async fn destroy(&self) -> EngineResult<()> {
        let slot = Arc::clone(&self.conn);
        let location = self.location.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = slot.lock().map_err(|_| EngineError::Poisoned)?;
            let conn = guard.take().ok_or(EngineError::Destroyed)?;
            if let Err((_, err)) = conn.close() {
                warn!(
                    "event=engine_destroy module=engine status=warn error_code=close_failed error={}",
                    err
                );
            }

            if let Some(path) = location {
                remove_database_files(&path)?;
            }
            info!("event=engine_destroy module=engine status=ok backend=sqlite");
            Ok(())
        })
        .await
        .map_err(EngineError::Join)?
    }
}

fn decode_document(key: &str, body: &str) -> EngineResult<Document> {
    let document: Document = serde_json::from_str(body)?;
    let derived = document.key();
    if derived != key {
        return Err(EngineError::InvalidData(format!(
            "row `{key}` holds document for `{derived}`"
        )));
    }
    Ok(document)
}

fn remove_database_files(path: &Path) -> EngineResult<()> {
    let mut candidates = vec![path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(suffix);
        candidates.push(PathBuf::from(sidecar));
    }

    for candidate in candidates {
        match std::fs::remove_file(&candidate) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(EngineError::Io(err)),
        }
    }
    Ok(())
}
