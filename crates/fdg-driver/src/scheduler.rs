// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-interval frame loop with explicit cancellation.
//!
//! The delay between ticks is relative: each iteration sleeps for the nominal
//! interval and then runs the tick, so a slow tick stretches the cadence. The
//! loop does not try to catch up; instead every tick carries the measured
//! timestamp and elapsed interval so callers see the real rate.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::clock::FrameClock;
use crate::engine::EngineError;

/// Create a linked stop handle/signal pair.
pub fn stop_signal() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx: Arc::new(tx) }, StopSignal { rx })
}

/// Requests that a running frame loop stop at its next iteration boundary.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Raise the stop flag. Idempotent.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    /// True once [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// A fresh signal observing this handle.
    pub fn signal(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observer side of a [`StopHandle`].
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// True once the linked handle asked to stop.
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }
}

/// One tick as observed by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameTick {
    /// Zero-based tick index over the scheduler's lifetime.
    pub index: u64,
    /// Clock time when the tick started (ms).
    pub timestamp_ms: f64,
    /// Measured time since the previous tick (or since the loop started).
    pub elapsed_ms: f64,
}

/// What a finished (or stopped) run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Ticks invoked, including failed ones.
    pub ticks: u64,
    /// Ticks whose callback returned an error.
    pub failed_ticks: u64,
    /// True if the run ended because of the stop signal.
    pub stopped: bool,
}

impl RunSummary {
    /// Fold another run into this one.
    pub fn absorb(&mut self, other: RunSummary) {
        self.ticks += other.ticks;
        self.failed_ticks += other.failed_ticks;
        self.stopped |= other.stopped;
    }
}

/// Drives a tick callback at a nominal interval until stopped.
///
/// At most one tick is ever in flight: the callback runs to completion before
/// the next delay starts.
pub struct FrameScheduler<C> {
    clock: C,
    interval_ms: f64,
    stop: StopSignal,
    ticks: u64,
    last_tick_ms: Option<f64>,
}

impl<C: FrameClock> FrameScheduler<C> {
    /// Create a scheduler ticking every `interval_ms`, stoppable through `stop`.
    pub fn new(clock: C, interval_ms: f64, stop: StopSignal) -> Self {
        Self {
            clock,
            interval_ms,
            stop,
            ticks: 0,
            last_tick_ms: None,
        }
    }

    /// Nominal interval in milliseconds.
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Ticks issued so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The clock driving this scheduler.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// True once the stop signal fired.
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Tick until the stop signal fires.
    ///
    /// A callback error is fatal for that frame only: it is logged, counted and
    /// the loop carries on with the next interval.
    pub async fn run<F>(&mut self, on_tick: F) -> RunSummary
    where
        F: FnMut(FrameTick) -> Result<(), EngineError>,
    {
        info!(interval_ms = self.interval_ms, "frame loop started");
        let summary = self.drive(None, on_tick).await;
        info!(
            ticks = summary.ticks,
            failed = summary.failed_ticks,
            "frame loop stopped"
        );
        summary
    }

    /// Tick exactly `count` times, or fewer if stopped first.
    pub async fn run_batch<F>(&mut self, count: u64, on_tick: F) -> RunSummary
    where
        F: FnMut(FrameTick) -> Result<(), EngineError>,
    {
        self.drive(Some(count), on_tick).await
    }

    async fn drive<F>(&mut self, limit: Option<u64>, mut on_tick: F) -> RunSummary
    where
        F: FnMut(FrameTick) -> Result<(), EngineError>,
    {
        let mut summary = RunSummary::default();
        loop {
            if limit.is_some_and(|n| summary.ticks >= n) {
                break;
            }
            if self.stop.is_stopped() {
                summary.stopped = true;
                break;
            }

            let started = self.clock.now_ms();
            self.clock.sleep(self.interval_ms).await;
            // A stop raised during the delay suppresses the pending tick.
            if self.stop.is_stopped() {
                summary.stopped = true;
                break;
            }

            let now = self.clock.now_ms();
            let tick = FrameTick {
                index: self.ticks,
                timestamp_ms: now,
                elapsed_ms: now - self.last_tick_ms.unwrap_or(started),
            };
            self.last_tick_ms = Some(now);
            self.ticks += 1;
            summary.ticks += 1;

            if let Err(err) = on_tick(tick) {
                summary.failed_ticks += 1;
                warn!(tick = tick.index, %err, "tick failed; skipping frame");
            }
            if self.ticks % 100 == 0 {
                debug!(
                    tick = self.ticks,
                    elapsed_ms = tick.elapsed_ms,
                    "frame loop heartbeat"
                );
            }
        }
        summary
    }
}
