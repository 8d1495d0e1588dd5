//! Note document and patch.

use crate::codec::{self, ROOT_PATH};
use crate::model::next_updated_at;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One note, filed under a folder by path value.
///
/// `folder` is a weak association: it is compared by string equality and
/// never repaired when the folder disappears outside a cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Caller-supplied stable id.
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Normalized path of the containing folder.
    #[serde(default = "root_folder")]
    pub folder: String,
    /// Normalized tag set.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Epoch ms of first creation.
    pub created_at: i64,
    /// Epoch ms of the latest write.
    pub updated_at: i64,
}

/// Partial note update. `None` fields keep the stored value.
///
/// `folder` and `tags` are expected to be normalized already; the store
/// normalizes caller input before merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder: Option<String>,
    pub tags: Option<BTreeSet<String>>,
}

impl NotePatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

fn root_folder() -> String {
    ROOT_PATH.to_string()
}

impl Note {
    /// Merges `patch` over `previous`, or over defaults when none.
    ///
    /// Defaults: empty title/content, root folder, no tags.
    pub fn merged(id: String, previous: Option<&Note>, patch: Option<NotePatch>) -> Self {
        let updated_at = next_updated_at(previous.map(|note| note.updated_at));
        let mut note = match previous {
            Some(previous) => Note {
                id,
                updated_at,
                ..previous.clone()
            },
            None => Note {
                id,
                title: String::new(),
                content: String::new(),
                folder: root_folder(),
                tags: BTreeSet::new(),
                created_at: updated_at,
                updated_at,
            },
        };

        if let Some(patch) = patch {
            if let Some(title) = patch.title {
                note.title = title;
            }
            if let Some(content) = patch.content {
                note.content = content;
            }
            if let Some(folder) = patch.folder {
                note.folder = folder;
            }
            if let Some(tags) = patch.tags {
                note.tags = tags;
            }
        }
        note
    }

    /// Storage key of this note.
    pub fn key(&self) -> String {
        codec::note_key(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NotePatch};

    #[test]
    fn first_write_uses_defaults() {
        let note = Note::merged("n1".to_string(), None, None);
        assert_eq!(note.folder, "/");
        assert!(note.title.is_empty());
        assert!(note.content.is_empty());
        assert!(note.tags.is_empty());
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.key(), "note:n1");
    }

    #[test]
    fn patch_replaces_only_present_fields() {
        let first = Note::merged(
            "n1".to_string(),
            None,
            Some(NotePatch::default().title("A").content("body")),
        );
        let second = Note::merged(
            "n1".to_string(),
            Some(&first),
            Some(NotePatch::default().title("B")),
        );
        assert_eq!(second.title, "B");
        assert_eq!(second.content, "body");
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
    }
}
