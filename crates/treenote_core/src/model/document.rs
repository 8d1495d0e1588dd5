//! Tagged union of everything the engine stores.

use crate::model::folder::Folder;
use crate::model::note::Note;
use serde::{Deserialize, Serialize};

/// A stored document: either a folder or a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Document {
    Folder(Folder),
    Note(Note),
}

/// Document kind discriminator, mirrored in the SQLite `documents.kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Folder,
    Note,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Note => "note",
        }
    }
}

impl Document {
    /// Storage key derived from the variant's identity field.
    pub fn key(&self) -> String {
        match self {
            Self::Folder(folder) => folder.key(),
            Self::Note(note) => note.key(),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Folder(_) => DocumentKind::Folder,
            Self::Note(_) => DocumentKind::Note,
        }
    }

    pub fn updated_at(&self) -> i64 {
        match self {
            Self::Folder(folder) => folder.updated_at,
            Self::Note(note) => note.updated_at,
        }
    }

    pub fn into_folder(self) -> Option<Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Note(_) => None,
        }
    }

    pub fn into_note(self) -> Option<Note> {
        match self {
            Self::Note(note) => Some(note),
            Self::Folder(_) => None,
        }
    }
}

impl From<Folder> for Document {
    fn from(value: Folder) -> Self {
        Self::Folder(value)
    }
}

impl From<Note> for Document {
    fn from(value: Note) -> Self {
        Self::Note(value)
    }
}
