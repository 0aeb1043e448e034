//! # INFLIGHT Core
//!
//! Synchronization kernel for overlapping CPU frame preparation with an
//! asynchronous consumer (a GPU queue, an encoder, a network batcher).
//!
//! ## Architecture Rules
//!
//! 1. **Bounded depth** - at most N frames are owned by the consumer
//! 2. **No write-after-submit** - a slot handed to the consumer is never
//!    touched by the producer until its completion fires
//! 3. **Pre-allocated** - every slot is allocated once at construction
//!
//! ```text
//!   Producer                       Consumer
//!   ────────                       ────────
//!   limiter.acquire()  ─┐
//!   pool.acquire(i)     │  N tokens
//!   write...            │
//!   writer.submit() ────┼────────► read slot i
//!                       │               │
//!   limiter.release() ◄─┴────────── completion
//! ```
//!
//! ## Example
//!
//! ```rust
//! use inflight_core::{FlightLimiter, SlotPool};
//!
//! let limiter = FlightLimiter::new(3).unwrap();
//! let pool = SlotPool::new(3, 64).unwrap();
//!
//! limiter.acquire();
//! let mut writer = pool.acquire(0);
//! writer[0] = 0xAB;
//! let submitted = writer.submit();
//! assert_eq!(submitted.read()[0], 0xAB);
//!
//! // Completion, normally on the consumer's thread
//! pool.release(submitted.index());
//! limiter.release();
//! assert_eq!(limiter.available(), 3);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod memory;
pub mod sync;

pub use error::{CoreError, CoreResult};
pub use memory::{SlotPool, SlotReader, SlotState, SlotWriter, SubmittedSlot};
pub use sync::FlightLimiter;
