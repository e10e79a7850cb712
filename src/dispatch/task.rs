// src/dispatch/task.rs

//! Units of work registered with a [`Dispatcher`](super::Dispatcher).

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::anyhow;

/// Identity of a task inside one dispatcher.
pub type TaskId = String;

/// Future produced by a work function.
pub type WorkFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// Caller-supplied work function. Side effects only; the dispatcher only
/// looks at whether it returned an error.
pub type WorkFn = Arc<dyn Fn() -> WorkFuture + Send + Sync>;

/// A work function plus the ids of the tasks it depends on.
#[derive(Clone)]
pub struct Task {
    pub(crate) id: TaskId,
    pub(crate) work: WorkFn,
    pub(crate) deps: Vec<TaskId>,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("deps", &self.deps)
            .finish_non_exhaustive()
    }
}

impl Task {
    /// Task backed by an async work function.
    pub fn new<F, Fut>(id: impl Into<TaskId>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            id: id.into(),
            work: Arc::new(move || Box::pin(f()) as WorkFuture),
            deps: Vec::new(),
        }
    }

    /// Task whose work function receives a bound argument on every call.
    pub fn with_args<A, F, Fut>(id: impl Into<TaskId>, f: F, args: A) -> Self
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::new(id, move || f(args.clone()))
    }

    /// Task backed by a synchronous work function.
    ///
    /// The function runs on tokio's blocking thread pool, so it may perform
    /// blocking IO (e.g. a synchronous HTTP call) without stalling other
    /// tasks of its level.
    pub fn blocking<F>(id: impl Into<TaskId>, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::new(id, move || {
            let f = Arc::clone(&f);
            async move {
                match tokio::task::spawn_blocking(move || f()).await {
                    Ok(result) => result,
                    Err(err) => Err(anyhow!("blocking work function did not complete: {err}")),
                }
            }
        })
    }

    /// Add one dependency.
    pub fn depends_on(mut self, dep: impl Into<TaskId>) -> Self {
        self.deps.push(dep.into());
        self
    }

    /// Add several dependencies.
    pub fn with_dependencies<I>(mut self, deps: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TaskId>,
    {
        self.deps.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dependencies(&self) -> &[TaskId] {
        &self.deps
    }
}
