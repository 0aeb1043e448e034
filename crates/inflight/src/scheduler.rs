//! # Frame Scheduler
//!
//! The per-frame driver. One `tick` per external frame signal:
//!
//! ```text
//! ┌───────┐ acquire  ┌──────────┐ cursor+1 ┌──────────────┐ update   ┌─────────┐
//! │ Idle  │─────────►│ Admitted │─────────►│ SlotSelected │─────────►│ Updated │
//! └───────┘          └──────────┘          └──────────────┘serialize └────┬────┘
//!     ▲                                                                   │ submit
//!     │            release (consumer thread)              ┌───────────┐   │
//!     └───────────────────────────────────────────────────│ Submitted │◄──┘
//!                                                         └───────────┘
//! ```
//!
//! ## Slot reuse
//!
//! The limiter only counts tokens; it does not know which slot is free. A
//! FIFO consumer always frees the oldest slot first, which is exactly the
//! next slot in rotation. For consumers that complete out of order the
//! scheduler also waits on the rotation slot's own state, so a slot is
//! never written before its own completion fired.

use std::sync::Arc;
use std::time::{Duration, Instant};

use inflight_core::{FlightLimiter, SlotPool};
use inflight_scene::{FrameUpdater, SceneState};

use crate::config::InflightConfig;
use crate::consumer::{CompletionHandle, FrameConsumer, FrameParameters, Rejected};
use crate::error::{InflightError, InflightResult, TickError};

/// Construction parameters not owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerSettings {
    /// Pool depth N.
    pub frames_in_flight: usize,
    /// Simulation time advanced per frame.
    pub simulation_step: f32,
    /// Initial surface size.
    pub surface: [u32; 2],
    /// Clear color passed to the consumer.
    pub clear_color: [f32; 4],
}

impl From<&InflightConfig> for SchedulerSettings {
    fn from(config: &InflightConfig) -> Self {
        Self {
            frames_in_flight: config.frames_in_flight,
            simulation_step: config.simulation_step,
            surface: config.surface,
            clear_color: config.clear_color,
        }
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self::from(&InflightConfig::default())
    }
}

/// What one successful tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame number, starting at 1.
    pub frame_number: u64,
    /// Slot the frame occupies.
    pub slot: usize,
    /// Vertices written.
    pub vertex_count: usize,
    /// Time spent waiting for admission.
    pub admission_wait: Duration,
}

/// Running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Frames handed to the consumer.
    pub frames_submitted: u64,
    /// Frames the consumer refused.
    pub submission_failures: u64,
    /// Ticks that timed out waiting for admission.
    pub admission_timeouts: u64,
    /// Surface resizes handled.
    pub resizes: u64,
    /// Total time the producer spent suspended.
    pub total_admission_wait: Duration,
    /// Longest single suspension.
    pub worst_admission_wait: Duration,
}

/// Drives the frame loop against a consumer.
///
/// Owns the whole pipeline context: limiter, slot pool, scene state. There
/// is no process-wide state.
pub struct FrameScheduler<C: FrameConsumer> {
    limiter: Arc<FlightLimiter>,
    pool: SlotPool,
    updater: FrameUpdater,
    state: SceneState,
    consumer: C,
    /// Last claimed slot; starts at N - 1 so the first frame claims slot 0.
    cursor: usize,
    frame_number: u64,
    simulation_step: f32,
    viewport: [f32; 2],
    clear_color: [f32; 4],
    stats: SchedulerStats,
}

impl<C: FrameConsumer> FrameScheduler<C> {
    /// Builds a scheduler with an explicit updater.
    ///
    /// # Errors
    ///
    /// Returns [`InflightError::Core`] if `frames_in_flight` is zero or the
    /// layout yields zero-sized slots.
    pub fn new(settings: SchedulerSettings, updater: FrameUpdater, consumer: C) -> InflightResult<Self> {
        let limiter = Arc::new(FlightLimiter::new(settings.frames_in_flight)?);
        let pool = SlotPool::new(settings.frames_in_flight, updater.region_size())?;
        let [width, height] = settings.surface;
        let state = updater.generate(width, height);

        tracing::info!(
            frames_in_flight = settings.frames_in_flight,
            slot_size = pool.slot_size(),
            entities = state.len(),
            "frame scheduler ready"
        );

        Ok(Self {
            limiter,
            pool,
            updater,
            state,
            consumer,
            cursor: settings.frames_in_flight - 1,
            frame_number: 0,
            simulation_step: settings.simulation_step,
            viewport: viewport(width, height),
            clear_color: settings.clear_color,
            stats: SchedulerStats::default(),
        })
    }

    /// Builds a scheduler from a configuration document.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn from_config(config: &InflightConfig, consumer: C) -> InflightResult<Self> {
        let updater = config.build_updater()?;
        Self::new(SchedulerSettings::from(config), updater, consumer)
    }

    /// Runs one frame, blocking while N frames are in flight.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Submit`] if the consumer refused the frame. The
    /// tick is then fully undone: same cursor, same simulation time, token
    /// returned. The caller should skip this tick and retry on the next.
    pub fn tick(&mut self) -> Result<FrameReport, TickError> {
        let start = Instant::now();
        self.limiter.acquire();
        let slot = self.next_slot();
        self.pool.wait_until_free(slot);
        self.run_admitted(slot, start.elapsed())
    }

    /// Runs one frame, waiting at most `timeout` for admission.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::AdmissionTimeout`] if nothing was admitted in
    /// time, and everything [`FrameScheduler::tick`] returns.
    pub fn tick_timeout(&mut self, timeout: Duration) -> Result<FrameReport, TickError> {
        let start = Instant::now();
        if !self.limiter.acquire_timeout(timeout) {
            return Err(self.admission_timeout(timeout));
        }

        let slot = self.next_slot();
        let remaining = timeout.saturating_sub(start.elapsed());
        if !self.pool.wait_until_free_timeout(slot, remaining) {
            self.limiter.release();
            return Err(self.admission_timeout(timeout));
        }
        self.run_admitted(slot, start.elapsed())
    }

    /// Surface resize: fresh layout, new viewport for later submissions.
    ///
    /// Frames already in flight keep the layout they were built with.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.updater.regenerate(&mut self.state, width, height);
        self.viewport = viewport(width, height);
        self.stats.resizes += 1;
        tracing::info!(width, height, entities = self.state.len(), "surface resized");
    }

    /// Waits for every in-flight frame to complete.
    ///
    /// Returns `true` if the consumer drained within `timeout`.
    #[must_use]
    pub fn drain(&self, timeout: Duration) -> bool {
        self.limiter.wait_idle_timeout(timeout)
    }

    /// Drains the pipeline and hands back the consumer.
    ///
    /// # Errors
    ///
    /// Returns [`InflightError::DrainTimeout`] if frames are still in flight
    /// after `timeout`; the pipeline is dropped regardless, slot memory
    /// stays alive for as long as the consumer holds it.
    pub fn shutdown(self, timeout: Duration) -> InflightResult<C> {
        if !self.drain(timeout) {
            let outstanding = self.limiter.outstanding();
            tracing::warn!(outstanding, ?timeout, "shutdown before consumer drained");
            return Err(InflightError::DrainTimeout {
                outstanding,
                timeout,
            });
        }

        tracing::info!(frames = self.stats.frames_submitted, "frame scheduler shut down");
        Ok(self.consumer)
    }

    /// Reclaims every slot and token after completions were lost.
    ///
    /// Only sound once the consumer holds no region. Returns the number of
    /// tokens reclaimed.
    pub fn reset_flight(&mut self) -> usize {
        let slots = self.pool.reclaim_all();
        let tokens = self.limiter.reset();
        tracing::warn!(slots, tokens, "in-flight state reset");
        tokens
    }

    /// Returns the admission gate.
    #[must_use]
    pub fn limiter(&self) -> &FlightLimiter {
        &self.limiter
    }

    /// Returns the slot pool.
    #[must_use]
    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }

    /// Returns the scene state.
    #[must_use]
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// Returns the frame updater.
    #[must_use]
    pub fn updater(&self) -> &FrameUpdater {
        &self.updater
    }

    /// Returns the consumer.
    #[must_use]
    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    /// Returns the consumer mutably.
    pub fn consumer_mut(&mut self) -> &mut C {
        &mut self.consumer
    }

    /// Returns the slot claimed by the most recent frame.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of frames submitted so far.
    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Returns the viewport passed with the next submission.
    #[must_use]
    pub fn viewport(&self) -> [f32; 2] {
        self.viewport
    }

    /// Returns running statistics.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    fn next_slot(&self) -> usize {
        (self.cursor + 1) % self.pool.len()
    }

    fn admission_timeout(&mut self, timeout: Duration) -> TickError {
        self.stats.admission_timeouts += 1;
        tracing::debug!(?timeout, "tick skipped: no admission");
        TickError::AdmissionTimeout(timeout)
    }

    /// Steps 3-5 once a token is held and `slot` is free.
    fn run_admitted(&mut self, slot: usize, waited: Duration) -> Result<FrameReport, TickError> {
        let previous_time = self.state.time();
        self.updater.update(&mut self.state, self.simulation_step);

        let mut writer = self.pool.acquire(slot);
        let vertex_count = match self.updater.serialize(&self.state, &mut writer) {
            Ok(count) => count,
            Err(e) => {
                drop(writer);
                self.state.set_time(previous_time);
                self.limiter.release();
                return Err(e.into());
            }
        };
        let region = writer.submit();

        let frame_number = self.frame_number + 1;
        let params = FrameParameters {
            frame_number,
            slot,
            vertex_count,
            viewport: self.viewport,
            clear_color: self.clear_color,
        };
        let on_complete = CompletionHandle::new(
            self.pool.clone(),
            Arc::clone(&self.limiter),
            slot,
            frame_number,
        );

        if let Err(rejected) = self.consumer.submit(region, params, on_complete) {
            let Rejected {
                error,
                region,
                on_complete,
            } = *rejected;
            drop(region);
            on_complete.rollback();
            self.state.set_time(previous_time);
            self.stats.submission_failures += 1;
            tracing::warn!(frame = frame_number, slot, %error, "submission failed, frame skipped");
            return Err(error.into());
        }

        self.cursor = slot;
        self.frame_number = frame_number;
        self.stats.frames_submitted += 1;
        self.stats.total_admission_wait += waited;
        self.stats.worst_admission_wait = self.stats.worst_admission_wait.max(waited);

        Ok(FrameReport {
            frame_number,
            slot,
            vertex_count,
            admission_wait: waited,
        })
    }
}

impl<C: FrameConsumer> std::fmt::Debug for FrameScheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("limiter", &self.limiter)
            .field("pool", &self.pool)
            .field("cursor", &self.cursor)
            .field("frame_number", &self.frame_number)
            .field("entities", &self.state.len())
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_precision_loss)]
fn viewport(width: u32, height: u32) -> [f32; 2] {
    [width as f32, height as f32]
}
