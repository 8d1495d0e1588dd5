//! Folder document and patch.

use crate::codec;
use crate::model::next_updated_at;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of the folder tree, identified by its normalized path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Normalized path. Root is `/`.
    pub path: String,
    /// Caller-defined attributes merged by folder patches.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Epoch ms of first creation.
    pub created_at: i64,
    /// Epoch ms of the latest write.
    pub updated_at: i64,
}

/// Partial folder update merged over the stored version.
///
/// Properties present in the patch replace stored values with the same
/// name; stored properties absent from the patch are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderPatch {
    pub properties: BTreeMap<String, String>,
}

impl FolderPatch {
    /// Patch setting a single property.
    pub fn property(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(name.into(), value.into());
        Self { properties }
    }

    /// Adds one more property to this patch.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

impl Folder {
    /// Merges `patch` over `previous`, or over a fresh document when none.
    ///
    /// `created_at` is carried over from `previous`; `updated_at` always
    /// advances.
    pub fn merged(path: String, previous: Option<&Folder>, patch: Option<FolderPatch>) -> Self {
        let updated_at = next_updated_at(previous.map(|folder| folder.updated_at));
        let created_at = previous.map_or(updated_at, |folder| folder.created_at);
        let mut properties = previous
            .map(|folder| folder.properties.clone())
            .unwrap_or_default();
        if let Some(patch) = patch {
            properties.extend(patch.properties);
        }

        Self {
            path,
            properties,
            created_at,
            updated_at,
        }
    }

    /// Storage key of this folder.
    pub fn key(&self) -> String {
        codec::folder_key(&self.path)
    }

    /// Last path segment; empty for root.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}
