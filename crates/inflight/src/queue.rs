//! # Queue Consumer
//!
//! A GPU-like executor: one worker thread draining a bounded FIFO queue.
//!
//! ```text
//!   Producer thread                 Worker thread
//!   ───────────────                 ─────────────
//!   submit() ──► [bounded channel] ──► read region
//!                                      executor.execute()
//!                                      on_complete.complete()
//! ```
//!
//! Frames complete strictly in submission order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use inflight_core::SubmittedSlot;

use crate::consumer::{CompletionHandle, FrameConsumer, FrameExecutor, FrameParameters, Rejected};
use crate::error::SubmitError;

/// A frame waiting for the worker.
struct Job {
    region: SubmittedSlot,
    params: FrameParameters,
    on_complete: CompletionHandle,
}

/// Executes frames on a dedicated worker thread.
pub struct QueueConsumer<E: FrameExecutor> {
    sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<E>>,
    completed: Arc<AtomicU64>,
}

impl<E: FrameExecutor> QueueConsumer<E> {
    /// Spawns the worker with a queue of `queue_depth` frames.
    ///
    /// A depth of at least the frames-in-flight bound means `submit` never
    /// sees a full queue.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to spawn the worker thread.
    #[must_use]
    pub fn spawn(executor: E, queue_depth: usize) -> Self {
        let (sender, receiver) = bounded(queue_depth.max(1));
        let completed = Arc::new(AtomicU64::new(0));
        let worker_completed = Arc::clone(&completed);

        let worker = thread::Builder::new()
            .name("inflight-consumer".into())
            .spawn(move || Self::worker_loop(executor, &receiver, &worker_completed))
            .expect("failed to spawn consumer thread");

        tracing::debug!(queue_depth, "queue consumer started");

        Self {
            sender: Some(sender),
            worker: Some(worker),
            completed,
        }
    }

    /// Worker thread main loop. Exits once every sender is gone.
    fn worker_loop(mut executor: E, receiver: &Receiver<Job>, completed: &AtomicU64) -> E {
        for job in receiver {
            {
                let bytes = job.region.read();
                executor.execute(&bytes, &job.params);
            }
            // Counted before the token returns so a drained pipeline
            // reports every frame.
            completed.fetch_add(1, Ordering::Release);
            job.on_complete.complete();
        }
        executor
    }

    /// Returns the number of frames the worker has completed.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Returns true while the worker thread is alive.
    ///
    /// The worker exits early only if the executor panicked; every later
    /// submission then fails with [`SubmitError::Disconnected`].
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|worker| !worker.is_finished())
    }

    /// Finishes every queued frame, stops the worker and returns the
    /// executor.
    ///
    /// # Panics
    ///
    /// Re-raises a panic from the worker thread.
    #[must_use]
    pub fn shutdown(mut self) -> E {
        self.sender.take();
        let worker = self.worker.take().expect("worker already joined");
        match worker.join() {
            Ok(executor) => executor,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

impl<E: FrameExecutor> FrameConsumer for QueueConsumer<E> {
    fn submit(
        &mut self,
        region: SubmittedSlot,
        params: FrameParameters,
        on_complete: CompletionHandle,
    ) -> Result<(), Box<Rejected>> {
        let job = Job {
            region,
            params,
            on_complete,
        };

        let Some(sender) = &self.sender else {
            return Err(reject(SubmitError::Disconnected, job));
        };

        sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(job) => reject(SubmitError::QueueFull, job),
            TrySendError::Disconnected(job) => reject(SubmitError::Disconnected, job),
        })
    }
}

impl<E: FrameExecutor> Drop for QueueConsumer<E> {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("consumer worker panicked");
            }
        }
    }
}

fn reject(error: SubmitError, job: Job) -> Box<Rejected> {
    Box::new(Rejected::new(error, job.region, job.on_complete))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_returns_executor() {
        let consumer = QueueConsumer::spawn(|_: &[u8], _: &FrameParameters| {}, 2);
        assert_eq!(consumer.completed(), 0);
        assert!(consumer.is_running());
        let _executor = consumer.shutdown();
    }
}
