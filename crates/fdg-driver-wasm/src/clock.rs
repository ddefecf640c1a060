// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `performance.now()` plus a `setTimeout` promise.

use std::future::Future;

use fdg_driver::FrameClock;
use js_sys::{Function, Promise};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Performance, Window};

use crate::error::HostError;

/// Browser [`FrameClock`].
#[derive(Debug, Clone)]
pub struct BrowserClock {
    window: Window,
    performance: Performance,
}

impl BrowserClock {
    /// Clock bound to `window`'s timer and performance API.
    pub fn new(window: &Window) -> Result<Self, HostError> {
        let performance = window.performance().ok_or(HostError::NoPerformance)?;
        Ok(Self {
            window: window.clone(),
            performance,
        })
    }
}

impl FrameClock for BrowserClock {
    fn now_ms(&self) -> f64 {
        self.performance.now()
    }

    fn sleep(&self, ms: f64) -> impl Future<Output = ()> {
        let window = self.window.clone();
        let delay = timeout_ms(ms);
        let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
            if let Err(err) =
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay)
            {
                tracing::warn!(err = %crate::error::describe(&err), "setTimeout failed; not delaying");
                let _ = resolve.call0(&JsValue::UNDEFINED);
            }
        });
        async move {
            // the promise never rejects
            let _ = JsFuture::from(promise).await;
        }
    }
}

/// Milliseconds as accepted by `setTimeout`: rounded, clamped to `0..=i32::MAX`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn timeout_ms(ms: f64) -> i32 {
    if !ms.is_finite() || ms <= 0.0 {
        return 0;
    }
    ms.round().min(f64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_rounded_and_clamped() {
        assert_eq!(timeout_ms(16.0), 16);
        assert_eq!(timeout_ms(16.4), 16);
        assert_eq!(timeout_ms(-3.0), 0);
        assert_eq!(timeout_ms(f64::NAN), 0);
        assert_eq!(timeout_ms(f64::INFINITY), 0);
        assert_eq!(timeout_ms(1e12), i32::MAX);
    }
}
