//! Typed reads over the flat engine.
//!
//! Engine `NotFound` becomes `None` here; every other engine error is
//! propagated unchanged.

use super::error::StoreResult;
use crate::codec::{self, folder_range, note_range};
use crate::engine::{DocumentEngine, EngineError};
use crate::model::document::Document;
use crate::model::folder::Folder;
use crate::model::note::Note;

pub(crate) async fn load_document(
    engine: &dyn DocumentEngine,
    key: &str,
) -> StoreResult<Option<Document>> {
    match engine.get(key).await {
        Ok(document) => Ok(Some(document)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Loads a folder by normalized path.
pub(crate) async fn load_folder(
    engine: &dyn DocumentEngine,
    path: &str,
) -> StoreResult<Option<Folder>> {
    let key = codec::folder_key(path);
    match load_document(engine, &key).await? {
        None => Ok(None),
        Some(Document::Folder(folder)) => Ok(Some(folder)),
        Some(Document::Note(_)) => Err(wrong_kind(&key, "folder")),
    }
}

/// Loads a note by id.
pub(crate) async fn load_note(engine: &dyn DocumentEngine, id: &str) -> StoreResult<Option<Note>> {
    let key = codec::note_key(id);
    match load_document(engine, &key).await? {
        None => Ok(None),
        Some(Document::Note(note)) => Ok(Some(note)),
        Some(Document::Folder(_)) => Err(wrong_kind(&key, "note")),
    }
}

/// Removes a key, treating absence as success. Returns whether a document
/// was actually removed.
pub(crate) async fn remove_if_present(engine: &dyn DocumentEngine, key: &str) -> StoreResult<bool> {
    match engine.remove(key).await {
        Ok(()) => Ok(true),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Folders whose keys fall inside `[start, end)`.
pub(crate) async fn scan_folders(
    engine: &dyn DocumentEngine,
    start: &str,
    end: &str,
) -> StoreResult<Vec<Folder>> {
    Ok(engine
        .range_scan(start, end)
        .await?
        .into_iter()
        .filter_map(Document::into_folder)
        .collect())
}

pub(crate) async fn scan_all_folders(engine: &dyn DocumentEngine) -> StoreResult<Vec<Folder>> {
    let (start, end) = folder_range();
    scan_folders(engine, &start, &end).await
}

pub(crate) async fn scan_all_notes(engine: &dyn DocumentEngine) -> StoreResult<Vec<Note>> {
    let (start, end) = note_range();
    Ok(engine
        .range_scan(&start, &end)
        .await?
        .into_iter()
        .filter_map(Document::into_note)
        .collect())
}

/// Whether a stored note is filed under `path`.
///
/// Imported notes may carry unnormalized folder values, so both sides are
/// compared in normalized form.
pub(crate) fn note_is_in_folder(note: &Note, path: &str) -> bool {
    if note.folder == path {
        return true;
    }
    codec::normalize_folder_path(&note.folder).is_ok_and(|folder| folder == path)
}

fn wrong_kind(key: &str, expected: &str) -> super::error::StoreError {
    EngineError::InvalidData(format!("document under `{key}` is not a {expected}")).into()
}
