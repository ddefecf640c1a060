// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Time source and delay port for the frame loop.

use std::future::Future;

/// Monotonic clock plus a cooperative delay.
///
/// The returned futures are not required to be `Send`: the driver runs on a
/// single thread (the browser event loop, or a current-thread runtime).
pub trait FrameClock {
    /// Monotonic time in milliseconds.
    fn now_ms(&self) -> f64;

    /// Suspend the caller for roughly `ms` milliseconds.
    fn sleep(&self, ms: f64) -> impl Future<Output = ()>;
}

impl<C: FrameClock + ?Sized> FrameClock for &C {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }

    fn sleep(&self, ms: f64) -> impl Future<Output = ()> {
        (**self).sleep(ms)
    }
}

/// [`FrameClock`] on top of tokio's timer.
///
/// Works with `tokio::time::pause()`, which makes timing tests deterministic.
#[cfg(feature = "tokio-clock")]
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

#[cfg(feature = "tokio-clock")]
impl TokioClock {
    /// Start a clock whose zero is "now".
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

#[cfg(feature = "tokio-clock")]
impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "tokio-clock")]
impl FrameClock for TokioClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn sleep(&self, ms: f64) -> impl Future<Output = ()> {
        let ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };
        tokio::time::sleep(std::time::Duration::from_secs_f64(ms / 1000.0))
    }
}
