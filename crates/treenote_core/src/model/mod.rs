//! Folder/note domain model.
//!
//! # Responsibility
//! - Define the documents persisted by the engine and the patches merged
//!   over them.
//! - Own timestamp policy shared by folder and note writes.
//!
//! # Invariants
//! - Document keys are derived from `Folder::path` / `Note::id` only.
//! - `updated_at` strictly increases across writes of the same document.

pub mod document;
pub mod folder;
pub mod note;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall clock as epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

/// Next `updated_at` value for a document previously written at `previous`.
///
/// Two writes inside the same millisecond still produce increasing values.
pub fn next_updated_at(previous: Option<i64>) -> i64 {
    let now = now_epoch_ms();
    match previous {
        Some(previous) if previous >= now => previous + 1,
        _ => now,
    }
}
