//! Process-wide rate-limited crawl queue
//!
//! All outbound crawls funnel through one shared queue that enforces the
//! upstream service's implicit rate limit: at most one crawl in flight, and
//! successive *dispatch starts* spaced by at least the configured interval.
//! Spacing is measured from the previous dispatch start, not from task
//! completion, so variable-latency fetches cannot stretch or shrink the gap.
//!
//! The gate is intentionally global rather than per-name: the constraint is
//! total outbound request rate, not per-item contention.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

/// Error returned when the queue worker is no longer running
#[derive(Debug, Error)]
#[error("rate-limited queue worker has shut down")]
pub struct QueueClosed;

type BoxedTask<T> = Pin<Box<dyn Future<Output = T> + Send>>;

struct QueuedTask<T> {
    task: BoxedTask<T>,
    done: oneshot::Sender<T>,
}

/// FIFO task queue with minimum spacing between dispatch starts
///
/// Tasks are deferred units of work producing a `T`. Submission order is
/// dispatch order; each caller awaits its own task's completion. The queue
/// owns a task exclusively from submission until it completes; tasks are
/// never retried or resubmitted.
///
/// Must be constructed inside a tokio runtime (the worker is spawned on
/// creation). Dropping every handle shuts the worker down once the backlog
/// drains.
pub struct RateLimitedQueue<T> {
    tx: mpsc::UnboundedSender<QueuedTask<T>>,
}

impl<T> Clone for RateLimitedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send + 'static> RateLimitedQueue<T> {
    /// Creates the queue and spawns its worker task
    ///
    /// # Arguments
    ///
    /// * `min_dispatch_interval` - Minimum time between successive dispatch
    ///   starts
    pub fn new(min_dispatch_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(rx, min_dispatch_interval));
        Self { tx }
    }

    /// Appends a task to the queue and awaits its result
    ///
    /// The task is dispatched once it reaches the head of the FIFO and the
    /// spacing condition holds. Returns `Err(QueueClosed)` only if the worker
    /// is gone, which does not happen while any handle is alive.
    pub async fn submit<F>(&self, task: F) -> Result<T, QueueClosed>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(QueuedTask {
                task: Box::pin(task),
                done: done_tx,
            })
            .map_err(|_| QueueClosed)?;
        done_rx.await.map_err(|_| QueueClosed)
    }
}

/// Worker loop: dispatches the head task when the spacing condition holds
///
/// Running tasks to completion inside the loop gives the "at most one in
/// flight" guarantee by construction; the dispatch timestamp is taken before
/// the task starts so the spacing invariant survives slow fetches.
async fn run_worker<T>(mut rx: mpsc::UnboundedReceiver<QueuedTask<T>>, interval: Duration) {
    let mut last_dispatch: Option<Instant> = None;

    while let Some(queued) = rx.recv().await {
        if let Some(last) = last_dispatch {
            let elapsed = last.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }

        last_dispatch = Some(Instant::now());
        let result = queued.task.await;

        // The submitter may have stopped waiting; that is not our problem.
        let _ = queued.done.send(result);
    }

    tracing::debug!("Rate-limited queue worker shutting down");
}
