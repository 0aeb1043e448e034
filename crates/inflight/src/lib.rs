//! # INFLIGHT
//!
//! Overlaps CPU frame preparation with an asynchronous consumer while
//! keeping at most N frames in flight.
//!
//! ## Frame Flow
//!
//! ```text
//!   tick()
//!     │ 1. wait for an admission token       (blocks at N in flight)
//!     │ 2. slot = (cursor + 1) % N
//!     │ 3. advance the scene, serialize into the slot
//!     │ 4. submit slot + parameters + completion handle
//!     ▼
//!   consumer ── executes ── on_complete.complete() ── token returned
//! ```
//!
//! ## Example
//!
//! ```rust
//! use inflight::{FrameParameters, FrameScheduler, InflightConfig, InlineConsumer};
//!
//! let mut config = InflightConfig::default();
//! config.frames_in_flight = 2;
//!
//! let consumer = InlineConsumer::new(|bytes: &[u8], params: &FrameParameters| {
//!     assert!(bytes.len() >= params.vertex_count * inflight::Vertex::SIZE);
//! });
//! let mut scheduler = FrameScheduler::from_config(&config, consumer).unwrap();
//!
//! assert_eq!(scheduler.tick().unwrap().slot, 0);
//! assert_eq!(scheduler.tick().unwrap().slot, 1);
//! assert_eq!(scheduler.tick().unwrap().slot, 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod consumer;
pub mod error;
pub mod queue;
pub mod scheduler;

pub use config::{InflightConfig, LayoutConfig, PixelFormat, TemplateConfig, TemplateVertexConfig, WaveConfig};
pub use consumer::{
    CompletionHandle, FrameConsumer, FrameExecutor, FrameParameters, InlineConsumer, Rejected,
};
pub use error::{ConfigError, InflightError, InflightResult, SubmitError, TickError};
pub use queue::QueueConsumer;
pub use scheduler::{FrameReport, FrameScheduler, SchedulerSettings, SchedulerStats};

pub use inflight_core::{FlightLimiter, SlotPool, SlotState, SubmittedSlot};
pub use inflight_scene::{
    Animator, FrameUpdater, Layout, Palette, SceneEntity, SceneState, Vertex, VisualTemplate,
    WaveAnimator,
};
