use std::collections::BTreeSet;
use std::sync::Arc;
use treenote_core::codec::parent_folder_path;
use treenote_core::{NotePatch, Store, StoreError, StoreOptions};

async fn assert_well_formed(store: &Store) {
    let folders: BTreeSet<String> = store
        .list_folders()
        .await
        .unwrap()
        .into_iter()
        .map(|folder| folder.path)
        .collect();
    assert!(folders.contains("/"));
    for path in &folders {
        if let Some(parent) = parent_folder_path(path) {
            assert!(folders.contains(&parent), "orphan folder {path}");
        }
    }
    for note in store.list_notes().await.unwrap() {
        assert!(folders.contains(&note.folder), "orphan note {}", note.id);
    }
}

/// Writers racing a cascade either land before it (and get removed) or
/// after it (and fail with a missing-parent error); no orphan survives.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_writes_and_cascades_keep_tree_well_formed() {
    let store = Arc::new(Store::open(&StoreOptions::memory("race")).unwrap());
    store.init().await.unwrap();
    store.put_folder("/a", None).await.unwrap();

    let mut handles = Vec::new();
    for worker in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            for round in 0..10 {
                let folder = format!("/a/w{worker}");
                match store.put_folder(&folder, None).await {
                    Ok(_) | Err(StoreError::MissingParent { .. }) => {}
                    Err(other) => panic!("unexpected folder error: {other}"),
                }
                let patch = NotePatch::default().folder(folder.as_str());
                match store.put_note(&format!("w{worker}-{round}"), Some(patch)).await {
                    Ok(_) | Err(StoreError::MissingFolder(_)) => {}
                    Err(other) => panic!("unexpected note error: {other}"),
                }
            }
        }));
    }
    for _ in 0..2 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            for _ in 0..5 {
                store.remove_folder("/a").await.unwrap();
                tokio::task::yield_now().await;
                store.put_folder("/a", None).await.unwrap();
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
    assert_well_formed(&store).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_to_one_note_are_not_lost() {
    let store = Arc::new(Store::open(&StoreOptions::memory("patches")).unwrap());
    store.init().await.unwrap();
    store.put_note("shared", None).await.unwrap();

    let mut handles = Vec::new();
    for worker in 0..4 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let patch = if worker % 2 == 0 {
                NotePatch::default().title(format!("title-{worker}"))
            } else {
                NotePatch::default().content(format!("content-{worker}"))
            };
            store.put_note("shared", Some(patch)).await.unwrap()
        }));
    }

    let mut stamps = Vec::new();
    for handle in handles {
        stamps.push(handle.await.unwrap().updated_at);
    }
    stamps.sort_unstable();
    stamps.dedup();
    assert_eq!(stamps.len(), 4);

    let note = store.get_note("shared").await.unwrap().unwrap();
    assert!(note.title.starts_with("title-"));
    assert!(note.content.starts_with("content-"));
}
