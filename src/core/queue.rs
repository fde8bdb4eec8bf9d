//! Sequential job queue
//!
//! Process-wide admission control for the AI pipeline: jobs from every
//! connection funnel into one FIFO served by a single worker task, so at
//! most one pipeline runs at a time and jobs complete in submission order.
//! Heavy load on one connection therefore delays the others; that is the
//! intended trade-off, bounding collaborator usage to one in-flight request
//! chain.
//!
//! The queue is an explicitly constructed value handed around by reference
//! (usually inside the application state), not a global; tests build their
//! own isolated instances.

use std::future::Future;
use std::pin::Pin;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// FIFO queue executing one job at a time on a dedicated worker task.
///
/// Cloning is cheap; all clones feed the same worker.
#[derive(Clone)]
pub struct JobQueue {
    jobs: mpsc::UnboundedSender<Job>,
}

impl JobQueue {
    /// Create the queue and spawn its worker task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let (jobs, mut receiver) = mpsc::unbounded_channel::<Job>();

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                // A panicking job must not take the worker (and every queued
                // job behind it) down with it.
                if std::panic::AssertUnwindSafe(job)
                    .catch_unwind()
                    .await
                    .is_err()
                {
                    warn!("queued job panicked; continuing with the next job");
                }
                // Start the next job on a fresh scheduler turn rather than
                // re-entering synchronously.
                tokio::task::yield_now().await;
            }
            debug!("job queue worker stopped");
        });

        Self { jobs }
    }

    /// Append a job to the queue.
    ///
    /// The returned receiver resolves with the job's output once it has run.
    /// Dropping the receiver does not cancel the job: it still executes to
    /// completion in its turn, and its output is discarded. A job's failure
    /// (an `Err` output) reaches only its own waiter; the queue moves on to
    /// the next job regardless.
    pub fn enqueue<F, T>(&self, job: F) -> oneshot::Receiver<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (done, result) = oneshot::channel();
        let wrapped: Job = Box::pin(async move {
            let output = job.await;
            // The waiter may already be gone (connection closed).
            let _ = done.send(output);
        });

        if self.jobs.send(wrapped).is_err() {
            warn!("job queue worker is gone; dropping job");
        }
        result
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}
