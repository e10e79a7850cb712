// src/dispatch/state.rs

//! Per-run task state.

use std::collections::HashMap;

use tracing::warn;

use crate::dispatch::task::TaskId;

/// State of a task within one dispatcher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRunState {
    /// Not decided yet: its level has not been reached.
    Pending,
    /// Work function returned successfully.
    Succeeded,
    /// Work function returned an error or panicked.
    Failed,
    /// Never started because a dependency failed or was skipped.
    Skipped,
}

impl TaskRunState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TaskRunState::Pending)
    }
}

/// Run state of every task, indexed like the dispatcher's task arena.
#[derive(Debug, Clone)]
pub struct RunStates<'a> {
    index: &'a HashMap<TaskId, usize>,
    states: Vec<TaskRunState>,
}

impl<'a> RunStates<'a> {
    pub fn new(index: &'a HashMap<TaskId, usize>) -> Self {
        Self {
            index,
            states: vec![TaskRunState::Pending; index.len()],
        }
    }

    pub fn get(&self, slot: usize) -> TaskRunState {
        self.states[slot]
    }

    pub fn set(&mut self, slot: usize, state: TaskRunState) {
        self.states[slot] = state;
    }

    /// First dependency that prevents a task from running, if any.
    ///
    /// Levels guarantee every dependency already sits in a terminal state,
    /// so anything other than `Succeeded` blocks the task.
    pub fn blocker<'d>(&self, task: &str, deps: &'d [TaskId]) -> Option<&'d str> {
        for dep in deps {
            let Some(slot) = self.index.get(dep) else {
                warn!(task = %task, dep = %dep, "dependency missing from task index");
                return Some(dep);
            };
            match self.states[*slot] {
                TaskRunState::Succeeded => {}
                TaskRunState::Failed | TaskRunState::Skipped => return Some(dep),
                TaskRunState::Pending => {
                    warn!(
                        task = %task,
                        dep = %dep,
                        "dependency still pending when its dependent was reached"
                    );
                    return Some(dep);
                }
            }
        }
        None
    }

    pub fn count(&self, state: TaskRunState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }

    pub fn all_terminal(&self) -> bool {
        self.states.iter().all(|s| s.is_terminal())
    }
}
