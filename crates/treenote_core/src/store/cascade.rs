//! Cascading folder removal.
//!
//! # Responsibility
//! - Remove a folder, the notes filed directly under it, and every
//!   descendant folder together with its notes.
//!
//! # Invariants
//! - Each visited folder runs the same steps: remove its document if
//!   present, remove notes whose `folder` equals its path, enqueue its
//!   descendants. Traversal order does not affect the final state.
//! - Every step is idempotent, so an interrupted cascade is finished by
//!   running it again.
//! - The work-list is explicit; depth of the tree never grows the call stack.
//!
//! Not atomic: a failure midway leaves some documents removed.

use super::error::StoreResult;
use super::lookup::{note_is_in_folder, remove_if_present, scan_all_notes, scan_folders};
use crate::codec::{descendant_range, folder_key};
use crate::engine::DocumentEngine;
use crate::model::note::Note;
use futures::future::try_join_all;
use log::debug;
use std::collections::HashSet;

/// Counts of documents actually removed by one cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub folders_removed: usize,
    pub notes_removed: usize,
}

struct FolderStep {
    folder_removed: bool,
    notes_removed: usize,
    descendants: Vec<String>,
}

/// Removes `path` and its subtree. `path` must be normalized and not root.
///
/// Folders of one frontier level are processed concurrently; each level is
/// discovered from the previous one's descendant scans.
pub(crate) async fn remove_subtree(
    engine: &dyn DocumentEngine,
    path: &str,
) -> StoreResult<CascadeReport> {
    // Writes are serialized by the caller, so one note snapshot stays valid
    // for the whole cascade.
    let notes = scan_all_notes(engine).await?;

    let mut report = CascadeReport::default();
    let mut visited: HashSet<String> = HashSet::from([path.to_string()]);
    let mut frontier = vec![path.to_string()];

    while !frontier.is_empty() {
        let steps = try_join_all(
            frontier
                .iter()
                .map(|current| remove_folder_step(engine, current, &notes)),
        )
        .await?;

        let mut next = Vec::new();
        for step in steps {
            report.folders_removed += usize::from(step.folder_removed);
            report.notes_removed += step.notes_removed;
            for descendant in step.descendants {
                if visited.insert(descendant.clone()) {
                    next.push(descendant);
                }
            }
        }
        frontier = next;
    }

    Ok(report)
}

async fn remove_folder_step(
    engine: &dyn DocumentEngine,
    path: &str,
    notes: &[Note],
) -> StoreResult<FolderStep> {
    let folder_removed = remove_if_present(engine, &folder_key(path)).await?;

    let note_keys: Vec<String> = notes
        .iter()
        .filter(|note| note_is_in_folder(note, path))
        .map(Note::key)
        .collect();
    let removed = try_join_all(
        note_keys
            .iter()
            .map(|key| remove_if_present(engine, key)),
    )
    .await?;
    let notes_removed = removed.into_iter().filter(|removed| *removed).count();

    let (start, end) = descendant_range(path);
    let descendants = scan_folders(engine, &start, &end)
        .await?
        .into_iter()
        .map(|folder| folder.path)
        .filter(|descendant| descendant != path)
        .collect();

    debug!(
        "event=cascade_step module=store status=ok folder_removed={} notes_removed={}",
        folder_removed, notes_removed
    );
    Ok(FolderStep {
        folder_removed,
        notes_removed,
        descendants,
    })
}
