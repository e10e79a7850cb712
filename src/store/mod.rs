// src/store/mod.rs

//! Persisted artifacts keyed by symbol.
//!
//! Work functions use an [`ArtifactStore`] to skip symbols that already have
//! a result and to read the results of their dependencies. The dispatcher
//! itself never touches the store.
//!
//! - [`file`] stores one file per key under a directory.
//! - [`memory`] keeps artifacts in memory only (tests, dry runs).
//! - [`idempotent`] wraps expensive work in a check-then-save contract.

use anyhow::Result;

pub mod file;
pub mod idempotent;
pub mod memory;

pub use file::FileArtifactStore;
pub use idempotent::{DependencyView, Idempotent, Outcome};
pub use memory::MemoryArtifactStore;

/// Abstract storage for generated artifacts.
///
/// Distinct tasks write distinct keys, so implementations only need to be
/// safe for concurrent access to different keys.
pub trait ArtifactStore: Send + Sync {
    fn exists(&self, key: &str) -> Result<bool>;
    fn load(&self, key: &str) -> Result<String>;
    fn save(&self, key: &str, artifact: &str) -> Result<()>;
}
