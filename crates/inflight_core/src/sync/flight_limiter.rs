//! # Flight Limiter
//!
//! Counting admission gate. One token per frame the consumer may own.
//!
//! ## Thread Safety
//!
//! - `acquire*`: producer thread (the only suspension point of the frame loop)
//! - `release`: any thread, typically the consumer's completion context
//! - `wait_idle*`: shutdown path, waits for every token to come home

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{CoreError, CoreResult};

/// Bounds the number of frames owned by the consumer.
///
/// Built from a mutex-guarded counter and two condition variables: one wakes
/// a single pending `acquire` per returned token, the other wakes every
/// shutdown waiter once all tokens are back.
///
/// ## Usage
///
/// ```rust
/// use inflight_core::FlightLimiter;
///
/// let limiter = FlightLimiter::new(2).unwrap();
/// limiter.acquire();
/// limiter.acquire();
/// assert!(!limiter.try_acquire()); // both frames in flight
///
/// limiter.release(); // completion of the oldest frame
/// assert!(limiter.try_acquire());
/// ```
pub struct FlightLimiter {
    /// Tokens currently held by the producer side.
    available: Mutex<usize>,
    /// Signalled once per returned token.
    token_returned: Condvar,
    /// Signalled when `available` reaches `capacity`.
    idle: Condvar,
    /// Maximum number of frames in flight.
    capacity: usize,
}

impl FlightLimiter {
    /// Creates a gate with `capacity` tokens, all available.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ZeroFramesInFlight`] if `capacity` is zero.
    pub fn new(capacity: usize) -> CoreResult<Self> {
        if capacity == 0 {
            return Err(CoreError::ZeroFramesInFlight);
        }

        Ok(Self {
            available: Mutex::new(capacity),
            token_returned: Condvar::new(),
            idle: Condvar::new(),
            capacity,
        })
    }

    /// Returns the maximum number of frames in flight.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of tokens the producer may still take.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        *self.available.lock()
    }

    /// Returns the number of tokens currently held by the consumer.
    #[inline]
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.capacity - self.available()
    }

    /// Takes one token, blocking until one is available.
    pub fn acquire(&self) {
        let mut available = self.available.lock();
        while *available == 0 {
            self.token_returned.wait(&mut available);
        }
        *available -= 1;
    }

    /// Takes one token if one is available right now.
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        let mut available = self.available.lock();
        if *available == 0 {
            return false;
        }
        *available -= 1;
        true
    }

    /// Takes one token, waiting at most `timeout`.
    ///
    /// Returns `false` if the deadline passed with every token outstanding.
    #[must_use]
    pub fn acquire_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut available = self.available.lock();
        while *available == 0 {
            if self
                .token_returned
                .wait_until(&mut available, deadline)
                .timed_out()
                && *available == 0
            {
                return false;
            }
        }
        *available -= 1;
        true
    }

    /// Returns one token and wakes one pending `acquire`.
    ///
    /// # Panics
    ///
    /// Panics if every token is already available: a release without a
    /// matching acquire would let the producer overrun the consumer.
    pub fn release(&self) {
        let mut available = self.available.lock();
        assert!(
            *available < self.capacity,
            "FlightLimiter released above capacity {}: unmatched release",
            self.capacity
        );
        *available += 1;
        let now_idle = *available == self.capacity;
        drop(available);

        self.token_returned.notify_one();
        if now_idle {
            self.idle.notify_all();
        }
    }

    /// Blocks until every token has been returned.
    pub fn wait_idle(&self) {
        let mut available = self.available.lock();
        while *available < self.capacity {
            self.idle.wait(&mut available);
        }
    }

    /// Blocks until every token has been returned or `timeout` elapses.
    ///
    /// Returns `true` if the consumer drained completely.
    #[must_use]
    pub fn wait_idle_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut available = self.available.lock();
        while *available < self.capacity {
            if self.idle.wait_until(&mut available, deadline).timed_out() {
                return *available == self.capacity;
            }
        }
        true
    }

    /// Forces every token back to available.
    ///
    /// Recovery path for tokens lost to a consumer that dropped a completion
    /// without firing it. Only sound once the consumer holds no regions.
    /// Returns the number of tokens reclaimed.
    pub fn reset(&self) -> usize {
        let mut available = self.available.lock();
        let reclaimed = self.capacity - *available;
        *available = self.capacity;
        drop(available);

        if reclaimed > 0 {
            tracing::warn!(reclaimed, "FlightLimiter reset reclaimed outstanding tokens");
        }
        self.token_returned.notify_all();
        self.idle.notify_all();
        reclaimed
    }
}

impl std::fmt::Debug for FlightLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightLimiter")
            .field("capacity", &self.capacity)
            .field("available", &self.available())
            .finish()
    }
}
