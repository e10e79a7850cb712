use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use docgraph::dispatch::Task;

/// Something a recorded work function did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Started(String),
    Finished(String),
}

/// Shared log for work functions built by [`Recorder::task`].
///
/// Records start/finish order and the highest number of work functions
/// that were running at the same time.
#[derive(Debug, Default)]
pub struct Recorder {
    marks: Mutex<Vec<Mark>>,
    failing: Mutex<HashSet<String>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the work function of `id` return an error.
    pub fn fail(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }

    /// A task that records itself, sleeps for `delay`, then succeeds
    /// (or fails if [`fail`](Self::fail) was called for `id`).
    pub fn task(self: &Arc<Self>, id: &str, delay: Duration) -> Task {
        let recorder = Arc::clone(self);
        let name = id.to_string();
        Task::new(id, move || {
            let recorder = Arc::clone(&recorder);
            let name = name.clone();
            async move { recorder.record(&name, delay).await }
        })
    }

    async fn record(&self, id: &str, delay: Duration) -> anyhow::Result<()> {
        self.marks.lock().unwrap().push(Mark::Started(id.to_string()));
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(delay).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        self.marks.lock().unwrap().push(Mark::Finished(id.to_string()));

        if self.failing.lock().unwrap().contains(id) {
            return Err(anyhow!("{id} failed on purpose"));
        }
        Ok(())
    }

    pub fn marks(&self) -> Vec<Mark> {
        self.marks.lock().unwrap().clone()
    }

    /// Ids in the order their work functions started.
    pub fn started(&self) -> Vec<String> {
        self.marks()
            .into_iter()
            .filter_map(|m| match m {
                Mark::Started(id) => Some(id),
                Mark::Finished(_) => None,
            })
            .collect()
    }

    pub fn position(&self, mark: &Mark) -> Option<usize> {
        self.marks().iter().position(|m| m == mark)
    }

    pub fn ran(&self, id: &str) -> bool {
        self.position(&Mark::Started(id.to_string())).is_some()
    }

    /// `true` if `first` finished before `second` started.
    pub fn finished_before_start(&self, first: &str, second: &str) -> bool {
        match (
            self.position(&Mark::Finished(first.to_string())),
            self.position(&Mark::Started(second.to_string())),
        ) {
            (Some(f), Some(s)) => f < s,
            _ => false,
        }
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}
