//! # Core Error Types
//!
//! Construction-time failures of the synchronization kernel. Everything that
//! happens after construction is either infallible or an invariant violation
//! (panic).

use thiserror::Error;

/// Errors raised while building core primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The frames-in-flight bound must be at least one.
    #[error("frames in flight must be at least 1")]
    ZeroFramesInFlight,

    /// A slot must be able to hold at least one byte.
    #[error("slot size must be non-zero")]
    ZeroSlotSize,
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
