// src/store/file.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::ArtifactStore;

/// Extension of artifact files.
pub const ARTIFACT_EXTENSION: &str = "md";

/// Stores each artifact in its own file under `root`.
///
/// The file name is the BLAKE3 hash of the key, so any symbol (including
/// ones like `ns::Type::method(int)`) maps to a safe, stable file name:
///
/// `<root>/<blake3(key)>.md`
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    root: PathBuf,
}

impl FileArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the artifact file for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{ARTIFACT_EXTENSION}", key_digest(key)))
    }
}

fn key_digest(key: &str) -> String {
    blake3::hash(key.as_bytes()).to_hex().to_string()
}

impl ArtifactStore for FileArtifactStore {
    /// Only a missing file counts as "no artifact"; any other I/O failure
    /// (unreadable root, root is not a directory) is an error.
    fn exists(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key);
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("checking artifact for '{key}' at {:?}", path)),
        }
    }

    fn load(&self, key: &str) -> Result<String> {
        let path = self.path_for(key);
        fs::read_to_string(&path)
            .with_context(|| format!("reading artifact for '{key}' at {:?}", path))
    }

    /// Write to a temporary file first and rename it into place, so a killed
    /// run never leaves a truncated artifact that a rerun would trust.
    fn save(&self, key: &str, artifact: &str) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("creating artifact directory at {:?}", self.root))?;

        let path = self.path_for(key);
        let tmp = self.root.join(format!(".{}.tmp", key_digest(key)));

        fs::write(&tmp, artifact)
            .with_context(|| format!("writing temporary artifact at {:?}", tmp))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("moving artifact into place at {:?}", path))?;

        debug!(key = %key, path = ?path, "stored artifact (file)");
        Ok(())
    }
}
