//! The bounded worker pool and graceful-shutdown task spawner of
//! `spec.md` §5: "Heavy CPU work (SSZ merkleization, signature
//! verification) MAY run on a bounded worker pool; results are returned
//! through the same queues." Grounded on the teacher's `task_executor`
//! crate (`tokio` + `exit-future` + `slog`).

use std::future::Future;
use std::sync::Arc;

use slog::{debug, Logger};
use tokio::sync::Semaphore;

/// Handed to every task/component that needs to spawn work: a runtime
/// handle, the process-wide shutdown signal, and a logger.
#[derive(Clone)]
pub struct TaskExecutor {
    handle: tokio::runtime::Handle,
    exit: exit_future::Exit,
    log: Logger,
}

impl TaskExecutor {
    pub fn new(handle: tokio::runtime::Handle, exit: exit_future::Exit, log: Logger) -> Self {
        TaskExecutor { handle, exit, log }
    }

    pub fn handle(&self) -> &tokio::runtime::Handle {
        &self.handle
    }

    pub fn log(&self) -> &Logger {
        &self.log
    }

    /// Spawn a future that is dropped in place when the node's shutdown
    /// signal fires, rather than run to completion. Used for the
    /// long-lived per-task loops of `spec.md` §5 (slot clock, gossip
    /// socket, duty executor).
    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static, name: &'static str) {
        let exit = self.exit.clone();
        let log = self.log.clone();
        self.handle.spawn(async move {
            futures::future::select(Box::pin(task), exit).await;
            debug!(log, "Task ended"; "name" => name);
        });
    }

    /// Run a blocking closure on the blocking-task pool, without
    /// bounding concurrency — used for I/O rather than CPU work.
    pub async fn spawn_blocking<F, R>(&self, f: F) -> Result<R, tokio::task::JoinError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.handle.spawn_blocking(f).await
    }
}

/// A bounded pool for CPU-heavy work (SSZ merkleization, signature
/// verification) that must not starve the reactor's own tasks.
/// `capacity` permits run at once; additional submissions queue.
#[derive(Clone)]
pub struct WorkerPool {
    executor: TaskExecutor,
    semaphore: Arc<Semaphore>,
}

impl WorkerPool {
    pub fn new(executor: TaskExecutor, capacity: usize) -> Self {
        WorkerPool {
            executor,
            semaphore: Arc::new(Semaphore::new(capacity.max(1))),
        }
    }

    /// Submit `f` to the pool, awaiting a free slot first.
    pub async fn submit<F, R>(&self, f: F) -> Result<R, tokio::task::JoinError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let permit = self.semaphore.clone().acquire_owned().await;
        let result = self.executor.spawn_blocking(f).await;
        drop(permit);
        result
    }
}
