//! # Slot Pool
//!
//! N byte regions with an explicit per-slot ownership state.
//!
//! ## Slot Lifecycle
//!
//! ```text
//!        acquire(i) + submit()          read()
//!  Free ─────────────────────► Submitted ─────► Draining
//!   ▲                              │                │
//!   └──────────── release(i) ──────┴────────────────┘
//! ```
//!
//! The producer may only write a `Free` slot. The consumer may only read a
//! `Submitted` or `Draining` slot. Both rules are asserted.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::error::{CoreError, CoreResult};

/// Ownership state of a single slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Owned by the producer, writable.
    Free,
    /// Handed to the consumer, not yet read.
    Submitted,
    /// The consumer has started reading.
    Draining,
}

impl SlotState {
    /// Returns true if the consumer currently owns the slot.
    #[inline]
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::Submitted | Self::Draining)
    }
}

/// State shared between the pool and every submitted handle.
struct PoolShared {
    /// One region per slot.
    regions: Box<[Mutex<Box<[u8]>>]>,
    /// Ownership state per slot.
    states: Mutex<Box<[SlotState]>>,
    /// Submission count per slot. Only written with `states` locked.
    generations: Box<[AtomicU64]>,
    /// Signalled whenever a slot returns to `Free`.
    freed: Condvar,
    /// Size of every region in bytes.
    slot_size: usize,
}

impl PoolShared {
    fn check_index(&self, index: usize) {
        assert!(
            index < self.regions.len(),
            "slot index {index} out of range for pool of {}",
            self.regions.len()
        );
    }

    fn release(&self, index: usize) {
        self.check_index(index);
        let mut states = self.states.lock();
        assert!(
            states[index].is_in_flight(),
            "slot {index} released while Free: unmatched completion"
        );
        states[index] = SlotState::Free;
        drop(states);
        self.freed.notify_all();
    }
}

/// Pool of pre-allocated slots.
///
/// Cloning the pool clones a handle; every clone addresses the same slots.
/// Regions live until the last pool handle and the last [`SubmittedSlot`]
/// are gone, so a consumer can never observe freed memory.
///
/// ## Usage
///
/// ```rust
/// use inflight_core::{SlotPool, SlotState};
///
/// let pool = SlotPool::new(2, 16).unwrap();
///
/// let mut writer = pool.acquire(1);
/// writer.fill(7);
/// let submitted = writer.submit();
/// assert_eq!(pool.state(1), SlotState::Submitted);
///
/// pool.release(submitted.index());
/// assert_eq!(pool.state(1), SlotState::Free);
/// ```
#[derive(Clone)]
pub struct SlotPool {
    shared: Arc<PoolShared>,
}

impl SlotPool {
    /// Allocates `slot_count` zeroed regions of `slot_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ZeroFramesInFlight`] if `slot_count` is zero and
    /// [`CoreError::ZeroSlotSize`] if `slot_size` is zero.
    pub fn new(slot_count: usize, slot_size: usize) -> CoreResult<Self> {
        if slot_count == 0 {
            return Err(CoreError::ZeroFramesInFlight);
        }
        if slot_size == 0 {
            return Err(CoreError::ZeroSlotSize);
        }

        let regions: Vec<Mutex<Box<[u8]>>> = (0..slot_count)
            .map(|_| Mutex::new(vec![0u8; slot_size].into_boxed_slice()))
            .collect();

        tracing::debug!(slot_count, slot_size, "SlotPool allocated");

        Ok(Self {
            shared: Arc::new(PoolShared {
                regions: regions.into_boxed_slice(),
                states: Mutex::new(vec![SlotState::Free; slot_count].into_boxed_slice()),
                generations: (0..slot_count).map(|_| AtomicU64::new(0)).collect(),
                freed: Condvar::new(),
                slot_size,
            }),
        })
    }

    /// Returns the number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.regions.len()
    }

    /// Always false: a pool holds at least one slot.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.regions.is_empty()
    }

    /// Returns the size of every slot in bytes.
    #[inline]
    #[must_use]
    pub fn slot_size(&self) -> usize {
        self.shared.slot_size
    }

    /// Returns the ownership state of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn state(&self, index: usize) -> SlotState {
        self.shared.check_index(index);
        self.shared.states.lock()[index]
    }

    /// Returns the number of slots currently owned by the consumer.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.shared
            .states
            .lock()
            .iter()
            .filter(|state| state.is_in_flight())
            .count()
    }

    /// Returns a writable view of slot `index`.
    ///
    /// No capacity check happens here; admission is the caller's job.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the slot is not `Free`.
    #[must_use]
    pub fn acquire(&self, index: usize) -> SlotWriter<'_> {
        self.shared.check_index(index);
        {
            let states = self.shared.states.lock();
            assert!(
                states[index] == SlotState::Free,
                "write to slot {index} while {:?}: producer may only write Free slots",
                states[index]
            );
        }

        SlotWriter {
            shared: &self.shared,
            index,
            region: self.shared.regions[index].lock(),
        }
    }

    /// Returns slot `index` to the producer and wakes any waiter.
    ///
    /// Called from the consumer's completion context.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the slot is already `Free`.
    pub fn release(&self, index: usize) {
        self.shared.release(index);
    }

    /// Blocks until slot `index` is `Free`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn wait_until_free(&self, index: usize) {
        self.shared.check_index(index);
        let mut states = self.shared.states.lock();
        while states[index] != SlotState::Free {
            self.shared.freed.wait(&mut states);
        }
    }

    /// Blocks until slot `index` is `Free` or `timeout` elapses.
    ///
    /// Returns `true` if the slot is free.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn wait_until_free_timeout(&self, index: usize, timeout: Duration) -> bool {
        self.shared.check_index(index);
        let deadline = Instant::now() + timeout;
        let mut states = self.shared.states.lock();
        while states[index] != SlotState::Free {
            if self.shared.freed.wait_until(&mut states, deadline).timed_out() {
                return states[index] == SlotState::Free;
            }
        }
        true
    }

    /// Marks every slot `Free` regardless of outstanding completions.
    ///
    /// Recovery after a consumer lost completions. Only sound once no
    /// consumer still reads any region. Returns the number of slots
    /// reclaimed.
    pub fn reclaim_all(&self) -> usize {
        let mut states = self.shared.states.lock();
        let mut reclaimed = 0;
        for state in states.iter_mut().filter(|state| state.is_in_flight()) {
            *state = SlotState::Free;
            reclaimed += 1;
        }
        drop(states);

        if reclaimed > 0 {
            tracing::warn!(reclaimed, "reclaimed in-flight slots");
            self.shared.freed.notify_all();
        }
        reclaimed
    }
}

impl std::fmt::Debug for SlotPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotPool")
            .field("slots", &self.len())
            .field("slot_size", &self.slot_size())
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

/// Exclusive producer access to one `Free` slot.
///
/// Dereferences to the slot's bytes. Dropping the writer without calling
/// [`SlotWriter::submit`] leaves the slot `Free`.
pub struct SlotWriter<'a> {
    shared: &'a Arc<PoolShared>,
    index: usize,
    region: MutexGuard<'a, Box<[u8]>>,
}

impl SlotWriter<'_> {
    /// Returns the slot index being written.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Hands the slot to the consumer.
    ///
    /// The writer is consumed, so no producer access survives the transfer.
    #[must_use]
    pub fn submit(self) -> SubmittedSlot {
        let Self { shared, index, region } = self;
        drop(region);

        let mut states = shared.states.lock();
        debug_assert_eq!(states[index], SlotState::Free);
        states[index] = SlotState::Submitted;
        let generation = shared.generations[index].fetch_add(1, Ordering::Relaxed) + 1;
        drop(states);

        SubmittedSlot {
            shared: Arc::clone(shared),
            index,
            generation,
        }
    }
}

impl Deref for SlotWriter<'_> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.region
    }
}

impl DerefMut for SlotWriter<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.region
    }
}

/// Consumer-side handle to a submitted slot.
///
/// Owned and `Send`: it travels to whichever thread executes the frame.
/// The handle is tied to one submission: once that submission is released
/// it never sees the slot's later contents.
pub struct SubmittedSlot {
    shared: Arc<PoolShared>,
    index: usize,
    generation: u64,
}

impl SubmittedSlot {
    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the size of the region in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.slot_size
    }

    /// Always false: slots are never empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.slot_size == 0
    }

    /// Returns the state of this submission.
    ///
    /// `Free` once released, even if the slot has since been resubmitted.
    #[must_use]
    pub fn state(&self) -> SlotState {
        let states = self.shared.states.lock();
        if self.is_current() {
            states[self.index]
        } else {
            SlotState::Free
        }
    }

    /// True while the slot still holds this submission. Call with `states`
    /// locked.
    fn is_current(&self) -> bool {
        self.shared.generations[self.index].load(Ordering::Relaxed) == self.generation
    }

    /// Reads the region. The first read moves the slot to `Draining`.
    ///
    /// # Panics
    ///
    /// Panics if the slot has already been released back to the producer.
    #[must_use]
    pub fn read(&self) -> SlotReader<'_> {
        {
            let mut states = self.shared.states.lock();
            let state = states[self.index];
            assert!(
                state.is_in_flight() && self.is_current(),
                "read of slot {} after release: completion fired before the consumer finished",
                self.index
            );
            states[self.index] = SlotState::Draining;
        }

        SlotReader {
            region: self.shared.regions[self.index].lock(),
        }
    }
}

impl std::fmt::Debug for SubmittedSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmittedSlot")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .field("len", &self.len())
            .finish()
    }
}

/// Read guard over a submitted region.
pub struct SlotReader<'a> {
    region: MutexGuard<'a, Box<[u8]>>,
}

impl Deref for SlotReader<'_> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.region
    }
}
