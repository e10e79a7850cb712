// src/dispatch/mod.rs

//! Dependency-aware concurrent task execution.
//!
//! - [`task`] defines tasks and work functions.
//! - [`pool`] is the bounded worker pool shared by dispatchers.
//! - [`dispatcher`] validates, levels and executes a task set.
//! - [`state`] tracks per-run task state.
//! - [`report`] holds run outcomes (summary and aggregated failures).

/// Progress events emitted while a dispatcher runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// A level was reached; `size` tasks belong to it.
    LevelStarted { level: usize, size: usize },
    /// A task obtained a worker slot and its work function started.
    TaskStarted { task: TaskId },
    TaskSucceeded { task: TaskId },
    TaskFailed { task: TaskId, error: String },
    /// A task was not run because `dependency` did not succeed.
    TaskSkipped { task: TaskId, dependency: TaskId },
    /// Every task of the level reached a terminal state.
    LevelFinished { level: usize },
}

pub mod dispatcher;
pub mod pool;
pub mod report;
pub mod state;
pub mod task;

pub use dispatcher::Dispatcher;
pub use pool::WorkerPool;
pub use report::{DispatchReport, RunSummary, TaskFailure};
pub use state::TaskRunState;
pub use task::{Task, TaskId, WorkFn, WorkFuture};
