// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! wasm-bindgen host for the force-directed arena driver.
//!
//! Adapts the browser to the driver's ports: a page-supplied JS engine object
//! to [`SimulationEngine`](fdg_driver::SimulationEngine), `web_sys::Element` to
//! [`DomNode`](fdg_driver::DomNode), `performance.now()`/`setTimeout` to
//! [`FrameClock`](fdg_driver::FrameClock) and `localStorage` to
//! [`ConfigStore`](fdg_driver::ConfigStore). [`WasmDriver`] is the exported
//! entry point.
#![deny(missing_docs)]

mod clock;
mod dom;
mod engine;
mod error;
mod host;
mod storage;

pub use clock::BrowserClock;
pub use dom::{rect_to_box, ElementNode};
pub use engine::{JsEngine, JsEngineAdapter};
pub use error::HostError;
pub use host::{load_config, save_config, WasmDriver};
pub use storage::LocalStorageConfigStore;

use wasm_bindgen::prelude::*;

/// Route `tracing` events to the browser console and, with `console-panic`,
/// install the panic hook. Runs once when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console-panic")]
    console_error_panic_hook::set_once();
    // a second instantiation keeps the first logger
    let _ = console_log::init_with_level(log::Level::Debug);
    tracing::debug!("fdg-driver-wasm loaded");
}
