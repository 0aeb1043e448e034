//! # Slot Memory
//!
//! Fixed set of equally sized regions reused cyclically across frames.
//!
//! ## Design Philosophy
//!
//! All memory is allocated once at construction. During the frame loop:
//! - No heap allocations
//! - Ownership moves explicitly: `SlotWriter` → `SubmittedSlot` → `release`
//! - Any access out of turn panics instead of corrupting an in-flight frame

mod slot_pool;

pub use slot_pool::{SlotPool, SlotReader, SlotState, SlotWriter, SubmittedSlot};
