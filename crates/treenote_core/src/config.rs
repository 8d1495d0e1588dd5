//! Store configuration.
//!
//! # Responsibility
//! - Describe which engine backs a store and under which name.
//! - Resolve configuration from the process environment for entry points.
//!
//! # Invariants
//! - `StoreAdapter::Sqlite` paths are used verbatim; no directory is created.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the SQLite database path.
pub const DB_PATH_ENV: &str = "TREENOTE_DB_PATH";
/// Environment variable overriding the store name.
pub const STORE_NAME_ENV: &str = "TREENOTE_STORE_NAME";
/// Name used when none is configured.
pub const DEFAULT_STORE_NAME: &str = "treenote";

/// Engine backing a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreAdapter {
    /// Volatile ordered map; data is lost when the store is dropped.
    Memory,
    /// Persistent SQLite database file.
    Sqlite { path: PathBuf },
}

/// Options accepted by `Store::open`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    pub name: String,
    pub adapter: StoreAdapter,
}

impl StoreOptions {
    pub fn memory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adapter: StoreAdapter::Memory,
        }
    }

    pub fn sqlite(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            adapter: StoreAdapter::Sqlite { path: path.into() },
        }
    }

    /// Reads `TREENOTE_DB_PATH` / `TREENOTE_STORE_NAME`.
    ///
    /// A missing or blank database path selects the in-memory adapter.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let name = lookup(STORE_NAME_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_NAME.to_string());

        match lookup(DB_PATH_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            Some(path) => Self::sqlite(name, path),
            None => Self::memory(name),
        }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::memory(DEFAULT_STORE_NAME)
    }
}
