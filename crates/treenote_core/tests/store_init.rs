use std::sync::Arc;
use treenote_core::{
    Document, DocumentEngine, MemoryEngine, Note, NotePatch, Store, StoreOptions,
};

fn orphan_note(id: &str, folder: &str) -> Document {
    let note = Note::merged(
        id.to_string(),
        None,
        Some(NotePatch::default().title("orphan").folder(folder)),
    );
    Document::Note(note)
}

#[tokio::test]
async fn init_on_empty_store_creates_only_root() {
    let engine = Arc::new(MemoryEngine::new());
    let store = Store::new("empty", engine.clone());
    assert!(!store.is_initialized());

    let report = store.init().await.unwrap();

    assert_eq!(report.folders_created, 1);
    assert_eq!(report.notes_scanned, 0);
    assert!(store.is_initialized());
    assert_eq!(engine.len().await, 1);
    let root = store.get_folder("/").await.unwrap().unwrap();
    assert_eq!(root.name(), "");
}

#[tokio::test]
async fn init_materializes_folders_of_orphan_notes() {
    let engine = Arc::new(MemoryEngine::new());
    let orphan = orphan_note("n1", "/a/b");
    engine.put(&orphan).await.unwrap();
    let store = Store::new("repair", engine.clone());

    let report = store.init().await.unwrap();

    assert_eq!(report.folders_created, 3);
    assert_eq!(report.notes_scanned, 1);
    for path in ["/", "/a", "/a/b"] {
        assert!(store.get_folder(path).await.unwrap().is_some(), "{path}");
    }
    let note = store.get_note("n1").await.unwrap().unwrap();
    assert_eq!(Document::Note(note), orphan);
}

#[tokio::test]
async fn init_normalizes_imported_note_folders() {
    let engine = Arc::new(MemoryEngine::new());
    engine.put(&orphan_note("n1", "x//y/")).await.unwrap();
    let store = Store::new("import", engine.clone());

    store.init().await.unwrap();

    assert!(store.get_folder("/x/y").await.unwrap().is_some());
    let ids: Vec<String> = store
        .list_notes_in_folder("/x/y")
        .await
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(ids, vec!["n1"]);
}

#[tokio::test]
async fn init_is_idempotent() {
    let store = Store::open(&StoreOptions::memory("again")).unwrap();
    store.init().await.unwrap();
    store.put_folder("/a", None).await.unwrap();
    let before = store.list_all_documents().await.unwrap();

    let report = store.init().await.unwrap();

    assert_eq!(report.folders_created, 0);
    assert_eq!(store.list_all_documents().await.unwrap(), before);
}
