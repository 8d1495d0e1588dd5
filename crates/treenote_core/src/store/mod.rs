//! Folder/note store facade.
//!
//! # Responsibility
//! - Expose the async folder/note API used by application callers.
//! - Normalize input, enforce tree invariants, and run cascades on top of
//!   an injected `DocumentEngine`.
//!
//! # Invariants
//! - Mutations (`init`, `put_*`, `remove_*`, `destroy`) hold the per-store
//!   write gate for their whole read-modify-write sequence.
//! - Reads take no gate and see whole documents only.
//! - Only metadata (paths, counts, durations) is logged; note titles and
//!   content never are.

mod cascade;
mod error;
mod invariants;
mod lookup;

pub use cascade::CascadeReport;
pub use error::{StoreError, StoreResult};

use crate::codec::{
    self, ancestor_paths, is_root, normalize_folder_path, normalize_tags, path_depth,
    validate_note_id, ValidationError, ROOT_PATH,
};
use crate::config::{StoreAdapter, StoreOptions};
use crate::engine::{DocumentEngine, MemoryEngine, SqliteEngine};
use crate::model::document::Document;
use crate::model::folder::{Folder, FolderPatch};
use crate::model::note::{Note, NotePatch};
use invariants::{assert_folder_exists, assert_parent_exists};
use log::{debug, info, warn};
use lookup::{load_folder, load_note, remove_if_present, scan_all_folders, scan_all_notes};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Outcome of [`Store::init`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Folder documents written by this run, root included.
    pub folders_created: usize,
    /// Notes inspected for folder repair.
    pub notes_scanned: usize,
}

/// Hierarchical folder/note store over a flat document engine.
pub struct Store {
    name: String,
    engine: Arc<dyn DocumentEngine>,
    write_gate: Mutex<()>,
    initialized: AtomicBool,
}

impl Store {
    /// Creates a store over an injected engine. Call [`Store::init`] before use.
    pub fn new(name: impl Into<String>, engine: Arc<dyn DocumentEngine>) -> Self {
        Self {
            name: name.into(),
            engine,
            write_gate: Mutex::new(()),
            initialized: AtomicBool::new(false),
        }
    }

    /// Builds the engine selected by `options` and wraps it in a store.
    pub fn open(options: &StoreOptions) -> StoreResult<Self> {
        let engine: Arc<dyn DocumentEngine> = match &options.adapter {
            StoreAdapter::Memory => Arc::new(MemoryEngine::new()),
            StoreAdapter::Sqlite { path } => Arc::new(SqliteEngine::open(path)?),
        };
        info!(
            "event=store_open module=store status=ok backend={}",
            engine.backend()
        );
        Ok(Self::new(options.name.clone(), engine))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `init` completed on this instance since it was opened.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Ensures root exists and materializes every folder referenced by a note.
    ///
    /// Missing ancestors are created shallowest first, so every written
    /// folder satisfies the parent invariant. Never removes data and is
    /// safe to re-run after a partial failure.
    pub async fn init(&self) -> StoreResult<InitReport> {
        let _gate = self.write_gate.lock().await;
        let started_at = Instant::now();

        let mut report = InitReport::default();
        if self.put_folder_locked(ROOT_PATH, None).await?.1 {
            report.folders_created += 1;
        }

        let notes = scan_all_notes(self.engine.as_ref()).await?;
        report.notes_scanned = notes.len();

        let mut wanted: BTreeSet<(usize, String)> = BTreeSet::new();
        for note in &notes {
            let path = match normalize_folder_path(&note.folder) {
                Ok(path) => path,
                Err(_) => {
                    warn!("event=store_init module=store status=skip reason=blank_note_folder");
                    continue;
                }
            };
            for ancestor in ancestor_paths(&path) {
                wanted.insert((path_depth(&ancestor), ancestor));
            }
            wanted.insert((path_depth(&path), path));
        }

        for (_, path) in wanted {
            if self.put_folder_locked(&path, None).await?.1 {
                report.folders_created += 1;
            }
        }

        self.initialized.store(true, Ordering::Release);
        info!(
            "event=store_init module=store status=ok folders_created={} notes_scanned={} duration_ms={}",
            report.folders_created,
            report.notes_scanned,
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Creates or updates the folder at `path`.
    ///
    /// With no patch and an existing folder, the stored folder is returned
    /// without writing.
    ///
    /// # Errors
    /// - `Validation` for a blank path.
    /// - `MissingParent` when the parent folder does not exist.
    pub async fn put_folder(&self, path: &str, patch: Option<FolderPatch>) -> StoreResult<Folder> {
        let path = normalize_folder_path(path)?;
        let _gate = self.write_gate.lock().await;
        let (folder, written) = self.put_folder_locked(&path, patch).await?;
        debug!(
            "event=folder_put module=store status=ok written={} depth={}",
            written,
            path_depth(&path)
        );
        Ok(folder)
    }

    /// Loads the folder at `path`; `None` when absent.
    pub async fn get_folder(&self, path: &str) -> StoreResult<Option<Folder>> {
        let path = normalize_folder_path(path)?;
        load_folder(self.engine.as_ref(), &path).await
    }

    /// Removes the folder at `path`, its notes, and all descendant folders
    /// with their notes.
    ///
    /// Idempotent: removing an absent folder still sweeps any leftovers
    /// under its path and succeeds.
    ///
    /// # Errors
    /// - `Validation(RootRemoval)` for root.
    pub async fn remove_folder(&self, path: &str) -> StoreResult<CascadeReport> {
        let path = normalize_folder_path(path)?;
        if is_root(&path) {
            return Err(ValidationError::RootRemoval.into());
        }

        let _gate = self.write_gate.lock().await;
        let started_at = Instant::now();
        match cascade::remove_subtree(self.engine.as_ref(), &path).await {
            Ok(report) => {
                info!(
                    "event=folder_remove module=store status=ok depth={} folders_removed={} notes_removed={} duration_ms={}",
                    path_depth(&path),
                    report.folders_removed,
                    report.notes_removed,
                    started_at.elapsed().as_millis()
                );
                Ok(report)
            }
            Err(err) => {
                warn!(
                    "event=folder_remove module=store status=error error_code={} duration_ms={} error={}",
                    err.code(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Irrecoverably deletes the whole underlying store.
    pub async fn destroy(&self) -> StoreResult<()> {
        let _gate = self.write_gate.lock().await;
        self.engine.destroy().await?;
        self.initialized.store(false, Ordering::Release);
        info!(
            "event=store_destroy module=store status=ok backend={}",
            self.engine.backend()
        );
        Ok(())
    }

    /// Creates or updates the note `id`, merging `patch` over the stored note.
    ///
    /// # Errors
    /// - `Validation` for a blank id, blank folder path, or blank tag.
    /// - `MissingFolder` when `patch.folder` names an absent folder.
    pub async fn put_note(&self, id: &str, patch: Option<NotePatch>) -> StoreResult<Note> {
        validate_note_id(id)?;
        let patch = patch.map(normalize_note_patch).transpose()?;

        let _gate = self.write_gate.lock().await;
        let engine = self.engine.as_ref();
        let previous = load_note(engine, id).await?;
        if let Some(folder) = patch.as_ref().and_then(|patch| patch.folder.as_deref()) {
            assert_folder_exists(engine, folder).await?;
        }

        let note = Note::merged(id.to_string(), previous.as_ref(), patch);
        engine.put(&Document::Note(note)).await?;
        debug!(
            "event=note_put module=store status=ok created={}",
            previous.is_none()
        );

        load_note(engine, id)
            .await?
            .ok_or(StoreError::InconsistentState(
                "written note not found in read-back",
            ))
    }

    /// Loads note `id`; `None` when absent.
    pub async fn get_note(&self, id: &str) -> StoreResult<Option<Note>> {
        validate_note_id(id)?;
        load_note(self.engine.as_ref(), id).await
    }

    /// Removes note `id`. Returns whether a note was removed; absence is not
    /// an error.
    pub async fn remove_note(&self, id: &str) -> StoreResult<bool> {
        validate_note_id(id)?;
        let _gate = self.write_gate.lock().await;
        let removed = remove_if_present(self.engine.as_ref(), &codec::note_key(id)).await?;
        debug!("event=note_remove module=store status=ok removed={removed}");
        Ok(removed)
    }

    /// Every stored document, folders and notes, in engine key order.
    pub async fn list_all_documents(&self) -> StoreResult<Vec<Document>> {
        Ok(self.engine.all_documents().await?)
    }

    /// Every folder, ordered by key.
    pub async fn list_folders(&self) -> StoreResult<Vec<Folder>> {
        scan_all_folders(self.engine.as_ref()).await
    }

    /// Every note, ordered by key.
    pub async fn list_notes(&self) -> StoreResult<Vec<Note>> {
        scan_all_notes(self.engine.as_ref()).await
    }

    /// Notes filed directly under `path` (not under its subfolders).
    pub async fn list_notes_in_folder(&self, path: &str) -> StoreResult<Vec<Note>> {
        let path = normalize_folder_path(path)?;
        Ok(scan_all_notes(self.engine.as_ref())
            .await?
            .into_iter()
            .filter(|note| lookup::note_is_in_folder(note, &path))
            .collect())
    }

    /// Folder write without taking the gate. Returns the stored folder and
    /// whether a write happened.
    async fn put_folder_locked(
        &self,
        path: &str,
        patch: Option<FolderPatch>,
    ) -> StoreResult<(Folder, bool)> {
        let engine = self.engine.as_ref();
        let previous = load_folder(engine, path).await?;
        assert_parent_exists(engine, path).await?;

        if patch.is_none() {
            if let Some(previous) = previous {
                return Ok((previous, false));
            }
        }

        let folder = Folder::merged(path.to_string(), previous.as_ref(), patch);
        engine.put(&Document::Folder(folder)).await?;
        let stored = load_folder(engine, path)
            .await?
            .ok_or(StoreError::InconsistentState(
                "written folder not found in read-back",
            ))?;
        Ok((stored, true))
    }
}

fn normalize_note_patch(mut patch: NotePatch) -> StoreResult<NotePatch> {
    if let Some(folder) = patch.folder.take() {
        patch.folder = Some(normalize_folder_path(&folder)?);
    }
    if let Some(tags) = patch.tags.take() {
        patch.tags = Some(normalize_tags(tags)?);
    }
    Ok(patch)
}
