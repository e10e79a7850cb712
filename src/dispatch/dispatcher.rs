// src/dispatch/dispatcher.rs

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::dispatch::DispatchEvent;
use crate::dispatch::pool::WorkerPool;
use crate::dispatch::report::{DispatchReport, RunSummary, TaskFailure};
use crate::dispatch::state::{RunStates, TaskRunState};
use crate::dispatch::task::{Task, TaskId};
use crate::errors::{DocgraphError, Result};
use crate::graph::{Levels, Symbol, SymbolGraph, compute_levels};

/// Level-by-level executor for a set of dependent tasks.
///
/// Tasks live in an arena indexed by position; dependencies are plain task
/// ids. [`run`](Self::run):
/// - validates that every dependency is registered and that the dependency
///   relation is acyclic, before anything executes
/// - splits the tasks into levels (sinks first)
/// - submits a whole level to the worker pool and waits for every task of
///   that level before starting the next one
/// - skips tasks whose dependencies failed or were skipped
/// - reports every failure of the run instead of stopping at the first
#[derive(Debug)]
pub struct Dispatcher {
    pool: WorkerPool,
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
    events: Option<mpsc::UnboundedSender<DispatchEvent>>,
}

impl Dispatcher {
    pub fn new(pool: WorkerPool) -> Self {
        Self {
            pool,
            tasks: Vec::new(),
            index: HashMap::new(),
            events: None,
        }
    }

    /// One task per symbol of `graph`, depending on the symbol's successors.
    ///
    /// `f` receives the symbol the task stands for.
    pub fn from_graph<F, Fut>(pool: WorkerPool, graph: &SymbolGraph, f: F) -> Self
    where
        F: Fn(Symbol) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let f = Arc::new(f);
        let mut dispatcher = Self::new(pool);

        for symbol in graph.symbols() {
            let f = Arc::clone(&f);
            let task = Task::with_args(symbol, move |s: Symbol| f(s), symbol.to_string())
                .with_dependencies(graph.successors(symbol));
            dispatcher.insert(task);
        }

        dispatcher
    }

    /// Forward progress events to `tx`.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<DispatchEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Register a task. Fails if a task with the same id already exists.
    pub fn add(mut self, task: Task) -> Result<Self> {
        if self.index.contains_key(&task.id) {
            return Err(DocgraphError::DuplicateTask(task.id));
        }
        self.insert(task);
        Ok(self)
    }

    /// Register several tasks, stopping at the first duplicate id.
    pub fn add_all<I>(self, tasks: I) -> Result<Self>
    where
        I: IntoIterator<Item = Task>,
    {
        tasks.into_iter().try_fold(self, |d, task| d.add(task))
    }

    fn insert(&mut self, task: Task) {
        self.index.insert(task.id.clone(), self.tasks.len());
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Registered task ids, in registration order.
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.id.as_str())
    }

    /// The dependency relation among registered tasks as a graph
    /// (`a -> b` when task `a` depends on task `b`).
    pub fn dependency_graph(&self) -> Result<SymbolGraph> {
        for task in &self.tasks {
            for dep in &task.deps {
                if dep == &task.id {
                    return Err(DocgraphError::DagCycle(format!(
                        "task '{}' depends on itself",
                        task.id
                    )));
                }
                if !self.index.contains_key(dep) {
                    return Err(DocgraphError::UnknownDependency {
                        task: task.id.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        Ok(SymbolGraph::from_parts(
            self.tasks.iter().map(|t| t.id.as_str()),
            self.tasks
                .iter()
                .flat_map(|t| t.deps.iter().map(move |d| (t.id.as_str(), d.as_str()))),
        ))
    }

    /// Validate the task set and split it into levels.
    pub fn levels(&self) -> Result<Levels> {
        let graph = self.dependency_graph()?;
        if !graph.is_acyclic() {
            let cycle = crate::graph::find_cycle(&graph)
                .map(|edges| {
                    edges
                        .iter()
                        .map(|(src, dst)| format!("{src} -> {dst}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            return Err(DocgraphError::DagCycle(format!(
                "task dependencies are not acyclic: {cycle}"
            )));
        }
        compute_levels(&graph)
    }

    /// Execute every registered task.
    ///
    /// Returns [`DocgraphError::TasksFailed`] listing every failed and
    /// skipped task if any work function failed; configuration errors are
    /// returned before any work function runs.
    pub async fn run(&self) -> Result<RunSummary> {
        let levels = self.levels()?;
        info!(
            tasks = self.tasks.len(),
            levels = levels.len(),
            concurrency = self.pool.limit(),
            "split tasks into levels"
        );

        let mut states = RunStates::new(&self.index);
        let mut report = DispatchReport::default();

        for (level, group) in levels.groups().iter().enumerate() {
            self.emit(DispatchEvent::LevelStarted {
                level,
                size: group.len(),
            });

            let mut handles: Vec<(usize, JoinHandle<anyhow::Result<()>>)> = Vec::new();

            for id in group {
                let Some(&slot) = self.index.get(id) else {
                    warn!(task = %id, "levelled task missing from index; ignoring");
                    continue;
                };
                let task = &self.tasks[slot];

                if let Some(blocker) = states.blocker(&task.id, &task.deps) {
                    warn!(
                        task = %task.id,
                        dependency = %blocker,
                        level,
                        "dependency did not succeed; skipping task"
                    );
                    states.set(slot, TaskRunState::Skipped);
                    report.skipped.push(task.id.clone());
                    self.emit(DispatchEvent::TaskSkipped {
                        task: task.id.clone(),
                        dependency: blocker.to_string(),
                    });
                    continue;
                }

                handles.push((slot, self.spawn_task(task)));
            }

            // Barrier: every submitted task of this level finishes before the
            // next level is looked at.
            for (slot, handle) in handles {
                let id = self.tasks[slot].id.clone();
                let result = match handle.await {
                    Ok(result) => result,
                    Err(err) => Err(anyhow!("work function panicked or was aborted: {err}")),
                };

                match result {
                    Ok(()) => {
                        states.set(slot, TaskRunState::Succeeded);
                        debug!(task = %id, level, "task succeeded");
                        self.emit(DispatchEvent::TaskSucceeded { task: id });
                    }
                    Err(error) => {
                        states.set(slot, TaskRunState::Failed);
                        let message = format!("{error:#}");
                        warn!(task = %id, level, error = %message, "task failed");
                        self.emit(DispatchEvent::TaskFailed {
                            task: id.clone(),
                            error: message,
                        });
                        report.failures.push(TaskFailure {
                            task: id,
                            level,
                            error,
                        });
                    }
                }
            }

            debug!(level, size = group.len(), "finished level");
            self.emit(DispatchEvent::LevelFinished { level });
        }

        debug!(all_terminal = states.all_terminal(), "dispatcher run complete");

        if report.failures.is_empty() {
            Ok(RunSummary {
                levels: levels.len(),
                succeeded: states.count(TaskRunState::Succeeded),
            })
        } else {
            Err(DocgraphError::TasksFailed(report))
        }
    }

    /// Submit one task to the pool.
    fn spawn_task(&self, task: &Task) -> JoinHandle<anyhow::Result<()>> {
        let pool = self.pool.clone();
        let work = Arc::clone(&task.work);
        let events = self.events.clone();
        let id = task.id.clone();

        tokio::spawn(async move {
            let _permit = pool.acquire().await?;
            debug!(task = %id, "starting task");
            if let Some(tx) = &events {
                let _ = tx.send(DispatchEvent::TaskStarted { task: id.clone() });
            }
            work().await
        })
    }

    fn emit(&self, event: DispatchEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}
