//! # Error Types
//!
//! - [`ConfigError`]: construction-time, fatal
//! - [`SubmitError`]: the consumer refused a frame, transient
//! - [`TickError`]: why a single tick produced no frame
//! - [`InflightError`]: everything surfaced by construction and shutdown
//!
//! Invariant violations (slot out of range, unmatched release, write to an
//! in-flight slot) are panics in `inflight_core`, never values.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use inflight_core::CoreError;
use inflight_scene::SceneError;

use crate::config::PixelFormat;

/// Invalid or unreadable configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The TOML text could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// The config file could not be read.
    #[error("failed to read config {path}: {message}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// OS error text.
        message: String,
    },

    /// Only `bgra8_unorm` output is produced.
    #[error("unsupported pixel format: {0:?}")]
    UnsupportedPixelFormat(PixelFormat),

    /// The simulation step is NaN or infinite.
    #[error("simulation step must be finite, got {0}")]
    InvalidStep(f32),

    /// The wave magnitude must be positive and finite.
    #[error("wave magnitude must be positive, got {0}")]
    InvalidMagnitude(f32),

    /// A custom template was requested with no vertices.
    #[error("visual template is missing")]
    MissingTemplate,

    /// The triangle size must be positive and finite.
    #[error("template size must be positive, got {0}")]
    InvalidTemplateSize(f32),
}

/// The consumer could not accept a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The executor's queue has no room.
    #[error("consumer queue is full")]
    QueueFull,

    /// The executor has shut down.
    #[error("consumer disconnected")]
    Disconnected,

    /// The device behind the consumer failed.
    #[error("device failure: {0}")]
    Device(String),
}

/// Why a tick produced no frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TickError {
    /// Submission failed; state was rolled back, retry next tick.
    #[error("submission failed: {0}")]
    Submit(#[from] SubmitError),

    /// No admission token (or the rotation slot) within the deadline.
    #[error("no frame admitted within {0:?}")]
    AdmissionTimeout(Duration),

    /// The scene did not fit its slot.
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Errors surfaced by construction and shutdown.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InflightError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid pool or limiter parameters.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid scene parameters.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// The consumer did not finish every frame in time.
    #[error("{outstanding} frames still in flight after {timeout:?}")]
    DrainTimeout {
        /// Frames not completed.
        outstanding: usize,
        /// How long shutdown waited.
        timeout: Duration,
    },
}

/// Result type for construction and shutdown.
pub type InflightResult<T> = Result<T, InflightError>;
