// src/dispatch/pool.rs

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::errors::{DocgraphError, Result};

/// Bounded pool of worker slots.
///
/// At most `limit` work functions run at the same time across every
/// dispatcher sharing this pool. Clones share the same slots.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    limit: usize,
}

impl WorkerPool {
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(DocgraphError::ConfigError(
                "worker pool concurrency must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(Self {
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Slots not currently held by a running work function.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait for a free slot. The slot is released when the permit drops.
    pub(crate) async fn acquire(&self) -> anyhow::Result<OwnedSemaphorePermit> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .context("worker pool closed")
    }
}
