//! Folder path normalization and document key derivation.
//!
//! # Responsibility
//! - Canonicalize caller-supplied folder paths.
//! - Map folders and notes into disjoint document key namespaces.
//!
//! # Invariants
//! - Normalized paths start with exactly one `/` and never end with `/`,
//!   except root which is exactly `/`.
//! - `folder_key` and `note_key` are injective and never collide with each
//!   other.
//! - Every function here is pure; no I/O.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Path of the root folder.
pub const ROOT_PATH: &str = "/";
/// Key namespace prefix for folder documents.
pub const FOLDER_KEY_PREFIX: &str = "folder:";
/// Key namespace prefix for note documents.
pub const NOTE_KEY_PREFIX: &str = "note:";
const PATH_SEPARATOR: char = '/';

static SEPARATOR_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/{2,}").expect("valid separator regex"));

/// Malformed caller input rejected before any storage access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Folder path is empty or whitespace only.
    EmptyPath,
    /// Note id is empty or whitespace only.
    EmptyNoteId,
    /// Root folder cannot be removed.
    RootRemoval,
    /// Tag value is blank after trim.
    BlankTag(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "folder path must not be blank"),
            Self::EmptyNoteId => write!(f, "note id must not be blank"),
            Self::RootRemoval => write!(f, "the root folder cannot be removed"),
            Self::BlankTag(value) => write!(f, "invalid tag: `{value}`"),
        }
    }
}

impl Error for ValidationError {}

/// Canonicalizes a folder path.
///
/// Runs of `/` collapse into one, a trailing `/` is dropped and a leading
/// `/` is added when missing. `"a//b/"` becomes `"/a/b"`.
///
/// # Errors
/// - `ValidationError::EmptyPath` when `path` is blank.
pub fn normalize_folder_path(path: &str) -> Result<String, ValidationError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPath);
    }

    let collapsed = SEPARATOR_RUN_RE.replace_all(trimmed, "/");
    let body = collapsed.trim_matches(PATH_SEPARATOR);
    if body.is_empty() {
        return Ok(ROOT_PATH.to_string());
    }
    Ok(format!("{PATH_SEPARATOR}{body}"))
}

/// Returns whether a normalized path denotes root.
pub fn is_root(path: &str) -> bool {
    path == ROOT_PATH
}

/// Returns the parent of a normalized path, or `None` for root.
pub fn parent_folder_path(path: &str) -> Option<String> {
    if is_root(path) {
        return None;
    }
    match path.rfind(PATH_SEPARATOR) {
        Some(0) | None => Some(ROOT_PATH.to_string()),
        Some(index) => Some(path[..index].to_string()),
    }
}

/// Returns every proper ancestor of a normalized path, root first.
///
/// `"/a/b/c"` yields `["/", "/a", "/a/b"]`; root yields nothing.
pub fn ancestor_paths(path: &str) -> Vec<String> {
    let mut ancestors = Vec::new();
    let mut cursor = parent_folder_path(path);
    while let Some(current) = cursor {
        cursor = parent_folder_path(&current);
        ancestors.push(current);
    }
    ancestors.reverse();
    ancestors
}

/// Number of segments below root. Root has depth 0.
pub fn path_depth(path: &str) -> usize {
    path.split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .count()
}

/// Document key for a normalized folder path.
pub fn folder_key(path: &str) -> String {
    format!("{FOLDER_KEY_PREFIX}{path}")
}

/// Document key for a note id.
pub fn note_key(id: &str) -> String {
    format!("{NOTE_KEY_PREFIX}{id}")
}

/// Half-open key range `[prefix, successor)` holding exactly the keys that
/// start with `prefix`.
///
/// `prefix` must end with an ASCII byte below `0x7f`; every prefix built
/// here ends with `:` or `/`. Bumping that byte gives the smallest key past
/// the prefix, whatever characters follow it.
fn prefix_range(prefix: String) -> (String, String) {
    let mut end = prefix.clone();
    let last = end.pop().map_or(0, u32::from);
    debug_assert!(last < 0x7f, "prefix must end with an ASCII byte");
    end.push(char::from_u32(last + 1).unwrap_or(char::MAX));
    (prefix, end)
}

/// Half-open key range covering every strict descendant of a folder.
///
/// For root the range starts at root's own key, which callers skip.
pub fn descendant_range(path: &str) -> (String, String) {
    if is_root(path) {
        prefix_range(folder_key(ROOT_PATH))
    } else {
        prefix_range(format!("{}{PATH_SEPARATOR}", folder_key(path)))
    }
}

/// Half-open key range covering every folder document.
pub fn folder_range() -> (String, String) {
    prefix_range(FOLDER_KEY_PREFIX.to_string())
}

/// Half-open key range covering every note document.
pub fn note_range() -> (String, String) {
    prefix_range(NOTE_KEY_PREFIX.to_string())
}

/// Rejects blank note ids. Ids are otherwise stored verbatim.
pub fn validate_note_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyNoteId);
    }
    Ok(())
}

/// Normalizes one tag value: trimmed and lowercased.
pub fn normalize_tag(tag: &str) -> Result<String, ValidationError> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankTag(tag.to_string()));
    }
    Ok(trimmed.to_lowercase())
}

/// Normalizes and deduplicates tag values.
pub fn normalize_tags<I, S>(tags: I) -> Result<BTreeSet<String>, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| normalize_tag(tag.as_ref()))
        .collect()
}
