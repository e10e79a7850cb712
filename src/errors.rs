// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::dispatch::DispatchReport;

#[derive(Error, Debug)]
pub enum DocgraphError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task already registered: {0}")]
    DuplicateTask(String),

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("{0}")]
    TasksFailed(DispatchReport),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DocgraphError>;
