// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Browser-side failures that never reach the engine.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Errors raised while wiring the driver into the page.
#[derive(Debug, Error)]
pub enum HostError {
    /// No global `window` (worker or non-browser host).
    #[error("no global `window` exists")]
    NoWindow,
    /// `window.document` is missing.
    #[error("window has no `document`")]
    NoDocument,
    /// `window.performance` is missing.
    #[error("window has no `performance` timer")]
    NoPerformance,
    /// `window.localStorage` is missing or blocked.
    #[error("localStorage is unavailable")]
    NoStorage,
    /// No element carries the configured arena id.
    #[error("no element with id `{0}`")]
    MissingArena(String),
    /// A frame loop is already driving this arena.
    #[error("a frame loop is already running")]
    AlreadyRunning,
    /// A DOM or JS call threw.
    #[error("js: {0}")]
    Js(String),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        Self::Js(describe(&value))
    }
}

/// Best-effort message for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
