//! # Flow Control for Frames in Flight
//!
//! ## The Problem
//!
//! ```text
//! Producer:  WRITE frame N+1 into a slot
//! Consumer:  READ frame N (still executing)
//!
//! Without a bound: producer laps the consumer → OVERWRITES LIVE DATA
//! With a bound:    producer suspends once N frames are outstanding
//! ```
//!
//! ## The Solution: Counting Admission
//!
//! ```text
//! available = N
//!   acquire(): wait while available == 0, then available -= 1
//!   release(): available += 1, wake one waiter
//! ```
//!
//! The release side is called from the consumer's completion context, so
//! the gate carries no thread affinity.

mod flight_limiter;

pub use flight_limiter::FlightLimiter;
