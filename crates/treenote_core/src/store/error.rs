//! Store-level error taxonomy.

use crate::codec::ValidationError;
use crate::engine::EngineError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by `Store` operations. None are retried internally.
#[derive(Debug)]
pub enum StoreError {
    /// Malformed caller input (blank path/id, root removal, blank tag).
    Validation(ValidationError),
    /// Folder write whose parent folder does not exist.
    MissingParent { path: String, parent: String },
    /// Note write targeting a folder that does not exist.
    MissingFolder(String),
    /// Underlying engine failure other than "not found".
    Engine(EngineError),
    /// A write succeeded but its read-back did not.
    InconsistentState(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MissingParent { path, parent } => {
                write!(f, "parent folder `{parent}` of `{path}` does not exist")
            }
            Self::MissingFolder(path) => write!(f, "folder `{path}` does not exist"),
            Self::Engine(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<EngineError> for StoreError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl StoreError {
    /// Stable short code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::MissingParent { .. } => "missing_parent",
            Self::MissingFolder(_) => "missing_folder",
            Self::Engine(_) => "engine",
            Self::InconsistentState(_) => "inconsistent_state",
        }
    }
}
