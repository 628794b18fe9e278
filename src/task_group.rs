use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::error::TaskError;

/// A group of spawned tasks with a hard ceiling on how many run at once.
///
/// [`spawn`](Self::spawn) waits for a free slot before spawning, so a full
/// group pushes back on the caller instead of growing. Every spawned handle
/// is registered before the task can run and is awaited by
/// [`wait`](Self::wait).
pub struct TaskGroup {
    concurrency_limiter: Arc<Semaphore>,
    tasks: FuturesUnordered<JoinHandle<Result<(), TaskError>>>,
    errors: Vec<TaskError>,
}

impl TaskGroup {
    pub fn new(limit: usize) -> Self {
        Self {
            concurrency_limiter: Arc::new(Semaphore::new(limit)),
            tasks: FuturesUnordered::new(),
            errors: Vec::new(),
        }
    }

    /// Tasks spawned and not yet collected.
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Spawns `task` once a slot frees up. Returns `false` without spawning
    /// if `cancel` fires first.
    pub async fn spawn<F>(&mut self, cancel: &CancellationToken, task: F) -> bool
    where
        F: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.reap();

        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return false,
            permit = Arc::clone(&self.concurrency_limiter).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return false,
            },
        };

        self.tasks.push(tokio::spawn(async move {
            let _permit = permit;
            task.await
        }));
        true
    }

    /// Collects tasks that already finished without waiting on the rest.
    pub fn reap(&mut self) {
        while let Some(Some(joined)) = self.tasks.next().now_or_never() {
            self.record(joined);
        }
    }

    /// Waits for every outstanding task and returns the errors collected
    /// since the last call.
    pub async fn wait(&mut self) -> Vec<TaskError> {
        while let Some(joined) = self.tasks.next().await {
            self.record(joined);
        }
        std::mem::take(&mut self.errors)
    }

    fn record(&mut self, joined: Result<Result<(), TaskError>, JoinError>) {
        let err = match joined {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e,
            Err(join_err) if join_err.is_panic() => {
                let payload = join_err.into_panic();
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                TaskError::Panicked(msg)
            }
            Err(_) => TaskError::Aborted,
        };
        error!(error = %err, "Task failed");
        self.errors.push(err);
    }
}
