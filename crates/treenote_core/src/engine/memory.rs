//! Ordered in-memory engine for tests and throwaway stores.

use super::{DocumentEngine, EngineError, EngineResult};
use crate::model::document::Document;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound;
use tokio::sync::RwLock;

/// `BTreeMap`-backed engine. `None` marks a destroyed engine.
#[derive(Debug)]
pub struct MemoryEngine {
    documents: RwLock<Option<BTreeMap<String, Document>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Some(BTreeMap::new())),
        }
    }

    /// Number of stored documents; zero once destroyed.
    pub async fn len(&self) -> usize {
        self.documents.read().await.as_ref().map_or(0, BTreeMap::len)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentEngine for MemoryEngine {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> EngineResult<Document> {
        let guard = self.documents.read().await;
        let documents = guard.as_ref().ok_or(EngineError::Destroyed)?;
        documents
            .get(key)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(key.to_string()))
    }

    async fn put(&self, document: &Document) -> EngineResult<()> {
        let mut guard = self.documents.write().await;
        let documents = guard.as_mut().ok_or(EngineError::Destroyed)?;
        documents.insert(document.key(), document.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> EngineResult<()> {
        let mut guard = self.documents.write().await;
        let documents = guard.as_mut().ok_or(EngineError::Destroyed)?;
        documents
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| EngineError::NotFound(key.to_string()))
    }

    async fn range_scan(&self, start: &str, end: &str) -> EngineResult<Vec<Document>> {
        let guard = self.documents.read().await;
        let documents = guard.as_ref().ok_or(EngineError::Destroyed)?;
        // BTreeMap::range panics on inverted bounds.
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(documents
            .range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
            .map(|(_, document)| document.clone())
            .collect())
    }

    async fn destroy(&self) -> EngineResult<()> {
        let mut guard = self.documents.write().await;
        if guard.take().is_none() {
            return Err(EngineError::Destroyed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryEngine;
    use crate::engine::{DocumentEngine, EngineError};
    use crate::model::document::Document;
    use crate::model::folder::Folder;

    fn folder(path: &str) -> Document {
        Folder::merged(path.to_string(), None, None).into()
    }

    #[tokio::test]
    async fn range_scan_is_half_open_and_key_ordered() {
        let engine = MemoryEngine::new();
        for path in ["/b", "/a", "/a/c", "/c"] {
            engine.put(&folder(path)).await.unwrap();
        }

        let keys: Vec<String> = engine
            .range_scan("folder:/a", "folder:/b")
            .await
            .unwrap()
            .iter()
            .map(Document::key)
            .collect();
        assert_eq!(keys, vec!["folder:/a", "folder:/a/c"]);
        assert!(engine.range_scan("z", "a").await.unwrap().is_empty());
        assert!(engine.range_scan("folder:/a", "folder:/a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_keys_report_not_found() {
        let engine = MemoryEngine::new();
        assert!(engine.get("folder:/nope").await.unwrap_err().is_not_found());
        assert!(engine.remove("folder:/nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn destroyed_engine_rejects_every_call() {
        let engine = MemoryEngine::new();
        engine.put(&folder("/")).await.unwrap();
        engine.destroy().await.unwrap();

        assert!(matches!(
            engine.get("folder:/").await,
            Err(EngineError::Destroyed)
        ));
        assert!(matches!(
            engine.put(&folder("/")).await,
            Err(EngineError::Destroyed)
        ));
        assert!(engine.is_empty().await);
    }
}
