// src/store/idempotent.rs

//! Check-then-compute-then-save wrapper for expensive work.
//!
//! Combined with the dispatcher's level barrier this gives resumable runs:
//! a rerun after a crash or a partial failure only recomputes the symbols
//! whose artifacts are missing.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use super::ArtifactStore;

/// What [`Idempotent::run`] did for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// An artifact already existed; nothing was computed.
    Cached,
    /// The artifact was computed and saved.
    Generated,
}

/// Read access to artifacts of already-processed dependencies.
#[derive(Clone)]
pub struct DependencyView {
    store: Arc<dyn ArtifactStore>,
}

impl DependencyView {
    /// Artifact of `dependency`. Missing artifacts are an error: the level
    /// barrier guarantees dependencies were persisted first.
    pub fn load(&self, dependency: &str) -> Result<String> {
        self.store
            .load(dependency)
            .with_context(|| format!("loading artifact of dependency '{dependency}'"))
    }

    /// Artifact of `symbol` if one exists.
    pub fn try_load(&self, symbol: &str) -> Result<Option<String>> {
        if self.store.exists(symbol)? {
            self.store.load(symbol).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[derive(Clone)]
pub struct Idempotent {
    store: Arc<dyn ArtifactStore>,
}

impl Idempotent {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Produce the artifact for `key` unless it already exists.
    ///
    /// `compute` only runs when the store has no artifact for `key`; its
    /// output is saved before this returns.
    pub async fn run<F, Fut>(&self, key: &str, compute: F) -> Result<Outcome>
    where
        F: FnOnce(DependencyView) -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        if self.store.exists(key)? {
            debug!(key = %key, "artifact exists; skipping generation");
            return Ok(Outcome::Cached);
        }

        let view = DependencyView {
            store: Arc::clone(&self.store),
        };
        let artifact = compute(view)
            .await
            .with_context(|| format!("generating artifact for '{key}'"))?;

        self.store
            .save(key, &artifact)
            .with_context(|| format!("saving artifact for '{key}'"))?;

        debug!(key = %key, bytes = artifact.len(), "generated artifact");
        Ok(Outcome::Generated)
    }
}
