// src/dispatch/report.rs

//! Outcome types for a dispatcher run.

use std::fmt;

use crate::dispatch::task::TaskId;

/// A task whose work function returned an error or panicked.
#[derive(Debug)]
pub struct TaskFailure {
    pub task: TaskId,
    /// Level the task was scheduled in.
    pub level: usize,
    pub error: anyhow::Error,
}

/// Every failure of a run, plus the tasks skipped because of them.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub failures: Vec<TaskFailure>,
    pub skipped: Vec<TaskId>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }

    pub fn failed_tasks(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.task.as_str())
    }

    pub fn failure_of(&self, task: &str) -> Option<&TaskFailure> {
        self.failures.iter().find(|f| f.task == task)
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} task(s) failed", self.failures.len())?;
        for failure in &self.failures {
            write!(
                f,
                "\n  - {} (level {}): {:#}",
                failure.task, failure.level, failure.error
            )?;
        }
        if !self.skipped.is_empty() {
            write!(
                f,
                "\n{} dependent task(s) skipped: {}",
                self.skipped.len(),
                self.skipped.join(", ")
            )?;
        }
        Ok(())
    }
}

/// Summary of a fully successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of levels executed.
    pub levels: usize,
    /// Number of tasks whose work function returned successfully.
    pub succeeded: usize,
}
