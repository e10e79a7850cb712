// src/exec/mod.rs

//! Process execution layer.
//!
//! [`command`] runs the configured generator command for one symbol using
//! `tokio::process::Command`, feeding it the artifacts of the symbol's
//! dependencies and persisting what it prints.

pub mod command;

pub use command::{CommandGenerator, GeneratorSettings};
