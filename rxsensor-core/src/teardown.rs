// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::sync::atomic::{AtomicBool, Ordering};

/// Guard that lets a cleanup action run at most once, whichever exit path gets there first.
///
/// Every exit path (explicit cancel, completion, drop) calls [`Teardown::run`] with the same
/// cleanup; only the first caller executes it. Concurrent callers that lose the race return
/// immediately without waiting for the winner.
///
/// ```
/// use rxsensor_core::Teardown;
///
/// let teardown = Teardown::new();
/// let mut calls = 0;
/// assert!(teardown.run(|| calls += 1));
/// assert!(!teardown.run(|| calls += 1));
/// assert_eq!(calls, 1);
/// ```
#[derive(Debug, Default)]
pub struct Teardown {
    fired: AtomicBool,
}

impl Teardown {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Runs `cleanup` if no earlier call did. Returns whether this call ran it.
    pub fn run<F: FnOnce()>(&self, cleanup: F) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        cleanup();
        true
    }

    /// `true` once some caller has claimed the cleanup (it may still be running).
    #[must_use]
    pub fn has_run(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}
