// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Capacity-1, overwrite-on-full handoff between a producer callback and a stream consumer.
//!
//! A [`LatestSlot`] holds at most one undelivered value. When the producer offers a new value
//! while the previous one is still pending, the old value is discarded. The producer never waits:
//! [`LatestSlot::offer`] only takes a short uncontended lock and wakes the consumer.
//!
//! ## Lifecycle
//!
//! - **Open**: offers are accepted.
//! - **Sealed**: offers are rejected; a value already pending may be kept or discarded.
//! - **Closed**: sealed, and the consumer observes end-of-stream once the pending value (if any)
//!   has been taken.
//!
//! Sealing and closing are separate steps so that an owner can stop the producer, run cleanup,
//! and only then let the consumer see the end of the stream.
//!
//! ## Example
//!
//! ```
//! use rxsensor_core::{LatestSlot, Offer};
//!
//! let slot = LatestSlot::new();
//! assert_eq!(slot.offer(1), Offer::Stored);
//! assert_eq!(slot.offer(2), Offer::Replaced);
//! assert_eq!(slot.try_take(), Some(2));
//!
//! slot.close();
//! assert_eq!(slot.offer(3), Offer::Rejected);
//! ```

use core::task::{Context, Poll, Waker};
use parking_lot::Mutex;

/// Outcome of [`LatestSlot::offer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// The slot was empty and now holds the value.
    Stored,
    /// The slot held an undelivered value, which was discarded in favour of the new one.
    Replaced,
    /// The slot is sealed or closed; the value was dropped.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Sealed,
    Closed,
}

struct SlotState<T> {
    pending: Option<T>,
    phase: Phase,
    waker: Option<Waker>,
    overwritten: u64,
}

/// Single-value overwrite channel. See the [module documentation](self).
pub struct LatestSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> LatestSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                pending: None,
                phase: Phase::Open,
                waker: None,
                overwritten: 0,
            }),
        }
    }

    /// Hand a value to the consumer, replacing any value it has not taken yet.
    pub fn offer(&self, value: T) -> Offer {
        let mut state = self.state.lock();
        if state.phase != Phase::Open {
            return Offer::Rejected;
        }

        let outcome = if state.pending.replace(value).is_some() {
            state.overwritten += 1;
            trace!(overwritten = state.overwritten, "pending value overwritten");
            Offer::Replaced
        } else {
            Offer::Stored
        };

        let waker = state.waker.take();
        drop(state);
        if let Some(waker) = waker {
            waker.wake();
        }
        outcome
    }

    /// Take the pending value, or register `cx`'s waker if there is none.
    ///
    /// Returns `Ready(None)` once the slot is closed and empty.
    pub fn poll_take(&self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let mut state = self.state.lock();
        if let Some(value) = state.pending.take() {
            return Poll::Ready(Some(value));
        }
        if state.phase == Phase::Closed {
            return Poll::Ready(None);
        }

        match &state.waker {
            Some(existing) if existing.will_wake(cx.waker()) => {}
            _ => state.waker = Some(cx.waker().clone()),
        }
        Poll::Pending
    }

    /// Take the pending value without registering interest.
    pub fn try_take(&self) -> Option<T> {
        self.state.lock().pending.take()
    }

    /// Stop accepting offers. With `keep_pending == false` an undelivered value is discarded.
    ///
    /// Sealing does not wake the consumer; [`close`](Self::close) does.
    pub fn seal(&self, keep_pending: bool) {
        let mut state = self.state.lock();
        if state.phase == Phase::Open {
            state.phase = Phase::Sealed;
        }
        if !keep_pending {
            state.pending = None;
        }
    }

    /// Seal the slot (keeping a pending value) and signal end-of-stream to the consumer.
    ///
    /// Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.phase = Phase::Closed;
        let waker = state.waker.take();
        drop(state);
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.lock().phase == Phase::Open
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().phase == Phase::Closed
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    /// Number of values discarded because a newer one arrived before they were taken.
    #[must_use]
    pub fn overwritten(&self) -> u64 {
        self.state.lock().overwritten
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for LatestSlot<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LatestSlot")
            .field("phase", &state.phase)
            .field("pending", &state.pending.is_some())
            .field("overwritten", &state.overwritten)
            .finish()
    }
}
