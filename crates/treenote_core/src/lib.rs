//! Core domain logic for TreeNote.
//! Hierarchical folder/note storage over a flat, ordered document engine.

pub mod codec;
pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod store;

pub use codec::ValidationError;
pub use config::{StoreAdapter, StoreOptions};
pub use engine::{DocumentEngine, EngineError, EngineResult, MemoryEngine, SqliteEngine};
pub use logging::{default_log_level, init_logging, log_level_from_env, logging_status};
pub use model::document::{Document, DocumentKind};
pub use model::folder::{Folder, FolderPatch};
pub use model::note::{Note, NotePatch};
pub use store::{CascadeReport, InitReport, Store, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
