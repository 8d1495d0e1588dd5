use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use treenote_core::{
    Document, DocumentEngine, EngineError, EngineResult, MemoryEngine, NotePatch, Store,
    StoreError,
};

/// Memory engine whose `remove` fails for one key while armed.
struct FlakyEngine {
    inner: MemoryEngine,
    failing_key: String,
    armed: AtomicBool,
}

impl FlakyEngine {
    fn new(failing_key: &str) -> Self {
        Self {
            inner: MemoryEngine::new(),
            failing_key: failing_key.to_string(),
            armed: AtomicBool::new(false),
        }
    }

    fn arm(&self, armed: bool) {
        self.armed.store(armed, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentEngine for FlakyEngine {
    fn backend(&self) -> &'static str {
        "flaky"
    }

    async fn get(&self, key: &str) -> EngineResult<Document> {
        self.inner.get(key).await
    }

    async fn put(&self, document: &Document) -> EngineResult<()> {
        self.inner.put(document).await
    }

    async fn remove(&self, key: &str) -> EngineResult<()> {
        if self.armed.load(Ordering::SeqCst) && key == self.failing_key {
            return Err(EngineError::InvalidData(format!("injected failure for {key}")));
        }
        self.inner.remove(key).await
    }

    async fn range_scan(&self, start: &str, end: &str) -> EngineResult<Vec<Document>> {
        self.inner.range_scan(start, end).await
    }

    async fn destroy(&self) -> EngineResult<()> {
        self.inner.destroy().await
    }
}

async fn seeded_store(engine: Arc<FlakyEngine>) -> Store {
    let store = Store::new("flaky", engine);
    store.init().await.unwrap();
    for path in ["/a", "/a/b", "/a/b/c", "/a/d"] {
        store.put_folder(path, None).await.unwrap();
    }
    for (id, folder) in [("n-a", "/a"), ("n-b", "/a/b"), ("n-c", "/a/b/c")] {
        store
            .put_note(id, Some(NotePatch::default().folder(folder)))
            .await
            .unwrap();
    }
    store
}

#[tokio::test]
async fn failed_cascade_reports_engine_error() {
    let engine = Arc::new(FlakyEngine::new("folder:/a/b"));
    let store = seeded_store(engine.clone()).await;
    engine.arm(true);

    let err = store.remove_folder("/a").await.unwrap_err();

    assert!(matches!(err, StoreError::Engine(EngineError::InvalidData(_))));
    assert_eq!(err.code(), "engine");
    assert!(store.get_folder("/a").await.unwrap().is_none());
    assert!(store.get_folder("/a/b").await.unwrap().is_some());
}

#[tokio::test]
async fn rerunning_cascade_finishes_partial_removal() {
    let engine = Arc::new(FlakyEngine::new("folder:/a/b"));
    let store = seeded_store(engine.clone()).await;
    engine.arm(true);
    store.remove_folder("/a").await.unwrap_err();

    engine.arm(false);
    let report = store.remove_folder("/a").await.unwrap();

    // Sibling steps of the failed frontier may or may not have run.
    assert!(report.folders_removed >= 1);
    let folders: Vec<String> = store
        .list_folders()
        .await
        .unwrap()
        .into_iter()
        .map(|folder| folder.path)
        .collect();
    assert_eq!(folders, vec!["/"]);
    assert!(store.list_notes().await.unwrap().is_empty());
}
