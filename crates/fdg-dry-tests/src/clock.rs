// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic clock for frame-loop tests.

use std::cell::Cell;
use std::future::{ready, Future};
use std::rc::Rc;

use fdg_driver::FrameClock;

/// A clock that only moves when slept on or advanced explicitly.
///
/// `sleep(ms)` advances time by `ms` and completes immediately, so a frame
/// loop runs as fast as the test executor allows while timestamps still look
/// like real pacing. Clones share the same time.
///
/// # Example
///
/// ```
/// use fdg_dry_tests::ManualClock;
/// use fdg_driver::FrameClock;
///
/// let clock = ManualClock::new();
/// clock.advance(16.0);
/// assert_eq!(clock.now_ms(), 16.0);
/// ```
#[derive(Clone, Default, Debug)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Clock starting at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward (simulated work).
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl FrameClock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn sleep(&self, ms: f64) -> impl Future<Output = ()> {
        self.advance(ms);
        ready(())
    }
}
