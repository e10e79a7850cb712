// src/store/memory.rs

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use tracing::debug;

use super::ArtifactStore;

/// Stores artifacts in memory only (lost on restart).
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.map
            .lock()
            .map_err(|_| anyhow!("memory artifact store lock poisoned"))
    }

    pub fn len(&self) -> usize {
        self.guard().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.guard()?.contains_key(key))
    }

    fn load(&self, key: &str) -> Result<String> {
        self.guard()?
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("no artifact stored for '{key}'"))
    }

    fn save(&self, key: &str, artifact: &str) -> Result<()> {
        self.guard()?.insert(key.to_string(), artifact.to_string());
        debug!(key = %key, "stored artifact (memory)");
        Ok(())
    }
}
