//! Tree invariant checks run before every folder/note write.
//!
//! # Invariants
//! - A non-root folder is written only while its parent folder exists.
//! - A note is filed only under an existing folder.
//!
//! Checks are read-then-write; the store write gate keeps them from
//! interleaving with other mutations.

use super::error::{StoreError, StoreResult};
use super::lookup::load_folder;
use crate::codec::parent_folder_path;
use crate::engine::DocumentEngine;
use log::warn;

/// Fails with `MissingParent` when `path` is not root and its parent is absent.
pub(crate) async fn assert_parent_exists(engine: &dyn DocumentEngine, path: &str) -> StoreResult<()> {
    let Some(parent) = parent_folder_path(path) else {
        return Ok(());
    };
    if load_folder(engine, &parent).await?.is_none() {
        warn!("event=invariant_check module=store status=rejected rule=parent_exists");
        return Err(StoreError::MissingParent {
            path: path.to_string(),
            parent,
        });
    }
    Ok(())
}

/// Fails with `MissingFolder` when no folder is stored at `path`.
pub(crate) async fn assert_folder_exists(engine: &dyn DocumentEngine, path: &str) -> StoreResult<()> {
    if load_folder(engine, path).await?.is_none() {
        warn!("event=invariant_check module=store status=rejected rule=folder_exists");
        return Err(StoreError::MissingFolder(path.to_string()));
    }
    Ok(())
}
