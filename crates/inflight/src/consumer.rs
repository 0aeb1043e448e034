//! # Consumer Boundary
//!
//! The scheduler hands each filled slot to a [`FrameConsumer`] together with
//! the frame's parameters and a [`CompletionHandle`]. The consumer fires the
//! handle exactly once, from any thread, after it has stopped reading.
//!
//! ```text
//!   FrameScheduler ──submit(region, params, on_complete)──► FrameConsumer
//!                                                               │ executes
//!   FlightLimiter ◄────────── on_complete.complete() ───────────┘
//! ```

use std::sync::Arc;

use inflight_core::{FlightLimiter, SlotPool, SubmittedSlot};

use crate::error::SubmitError;

/// Small per-frame values passed alongside the region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParameters {
    /// Monotonic frame number, starting at 1.
    pub frame_number: u64,
    /// Slot the frame occupies.
    pub slot: usize,
    /// Number of vertices in the region's stream.
    pub vertex_count: usize,
    /// Viewport size in pixels.
    pub viewport: [f32; 2],
    /// Color to clear to before drawing.
    pub clear_color: [f32; 4],
}

impl FrameParameters {
    /// Viewport as raw bytes, the form a vertex shader constant expects.
    #[must_use]
    pub fn viewport_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.viewport)
    }
}

/// Returns a frame's slot and admission token to the producer.
///
/// Move-only: [`CompletionHandle::complete`] consumes it, so it fires at
/// most once. Dropping it unfired leaks the slot and the token; the
/// scheduler then needs [`crate::FrameScheduler::reset_flight`].
#[must_use = "a frame is only released when its completion fires"]
pub struct CompletionHandle {
    pool: SlotPool,
    limiter: Arc<FlightLimiter>,
    slot: usize,
    frame_number: u64,
    fired: bool,
}

impl CompletionHandle {
    pub(crate) fn new(
        pool: SlotPool,
        limiter: Arc<FlightLimiter>,
        slot: usize,
        frame_number: u64,
    ) -> Self {
        Self {
            pool,
            limiter,
            slot,
            frame_number,
            fired: false,
        }
    }

    /// Returns the slot this handle releases.
    #[must_use]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Returns the frame this handle completes.
    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Signals that the consumer is done reading the frame's region.
    pub fn complete(mut self) {
        tracing::trace!(frame = self.frame_number, slot = self.slot, "frame completed");
        self.fire();
    }

    /// Undoes a submission the consumer never accepted.
    pub(crate) fn rollback(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        // Slot first: once the token is back the producer may claim it.
        self.pool.release(self.slot);
        self.limiter.release();
        self.fired = true;
    }
}

impl Drop for CompletionHandle {
    fn drop(&mut self) {
        if !self.fired {
            tracing::warn!(
                frame = self.frame_number,
                slot = self.slot,
                "completion dropped without firing: slot and admission token lost until reset"
            );
        }
    }
}

impl std::fmt::Debug for CompletionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionHandle")
            .field("slot", &self.slot)
            .field("frame_number", &self.frame_number)
            .finish_non_exhaustive()
    }
}

/// A frame the consumer refused, with ownership handed back.
#[derive(Debug)]
pub struct Rejected {
    /// Why the frame was refused.
    pub error: SubmitError,
    /// The region, unread.
    pub region: SubmittedSlot,
    /// The unfired completion.
    pub on_complete: CompletionHandle,
}

impl Rejected {
    /// Bundles a refused frame.
    #[must_use]
    pub fn new(error: SubmitError, region: SubmittedSlot, on_complete: CompletionHandle) -> Self {
        Self {
            error,
            region,
            on_complete,
        }
    }
}

/// Asynchronous executor of submitted frames.
pub trait FrameConsumer {
    /// Accepts a filled region for execution.
    ///
    /// On success the consumer owns `region` until it calls
    /// `on_complete.complete()`. On failure it returns both untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] if the frame cannot be accepted.
    fn submit(
        &mut self,
        region: SubmittedSlot,
        params: FrameParameters,
        on_complete: CompletionHandle,
    ) -> Result<(), Box<Rejected>>;
}

/// Work run over each submitted region.
pub trait FrameExecutor: Send + 'static {
    /// Processes one frame's vertex stream.
    fn execute(&mut self, region: &[u8], params: &FrameParameters);
}

impl<F> FrameExecutor for F
where
    F: FnMut(&[u8], &FrameParameters) + Send + 'static,
{
    fn execute(&mut self, region: &[u8], params: &FrameParameters) {
        self(region, params);
    }
}

/// Runs the executor synchronously inside `submit` and completes at once.
///
/// Frames complete in submission order with zero latency. Useful as a CPU
/// fallback and for deterministic tests.
pub struct InlineConsumer<E> {
    executor: E,
    frames_executed: u64,
}

impl<E: FrameExecutor> InlineConsumer<E> {
    /// Wraps an executor.
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            frames_executed: 0,
        }
    }

    /// Returns the number of frames executed.
    #[must_use]
    pub fn frames_executed(&self) -> u64 {
        self.frames_executed
    }

    /// Returns the executor.
    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Unwraps the executor.
    #[must_use]
    pub fn into_executor(self) -> E {
        self.executor
    }
}

impl<E: FrameExecutor> FrameConsumer for InlineConsumer<E> {
    fn submit(
        &mut self,
        region: SubmittedSlot,
        params: FrameParameters,
        on_complete: CompletionHandle,
    ) -> Result<(), Box<Rejected>> {
        {
            let bytes = region.read();
            self.executor.execute(&bytes, &params);
        }
        self.frames_executed += 1;
        on_complete.complete();
        Ok(())
    }
}
