// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The object the page talks to.
//!
//! `WasmDriver` owns an [`ArenaDriver`] behind an `Rc`, so the DOM listeners and
//! the frame-loop promise can all reach it from the single browser thread.
//! Dropping the driver (JS `free()`) stops any running loop and unhooks the
//! listeners.

use std::cell::Cell;
use std::rc::Rc;

use fdg_driver::{ArenaDriver, ConfigService, DriverConfig, PointerEvent};
use js_sys::{Array, Promise};
use serde::Serialize;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Element, MouseEvent, ResizeObserver, Window};

use crate::clock::BrowserClock;
use crate::dom::{rect_to_box, ElementNode};
use crate::engine::{JsEngine, JsEngineAdapter};
use crate::error::HostError;
use crate::storage::LocalStorageConfigStore;

type BrowserDriver = ArenaDriver<JsEngineAdapter, BrowserClock>;

fn window() -> Result<Window, HostError> {
    web_sys::window().ok_or(HostError::NoWindow)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// Resolve the configuration: an explicit object wins, otherwise whatever is
/// stored in `localStorage`, otherwise defaults.
fn resolve_config(window: &Window, config: JsValue) -> Result<DriverConfig, JsError> {
    if !config.is_undefined() && !config.is_null() {
        let config: DriverConfig = serde_wasm_bindgen::from_value(config)?;
        config.validate()?;
        return Ok(config);
    }
    match LocalStorageConfigStore::new(window) {
        Ok(store) => Ok(ConfigService::new(store).load_driver_config()?),
        Err(err) => {
            warn!(%err, "no config store; using defaults");
            Ok(DriverConfig::default())
        }
    }
}

/// Persist `config` to `localStorage` for later sessions.
#[wasm_bindgen(js_name = saveConfig)]
pub fn save_config(config: JsValue) -> Result<(), JsError> {
    let config: DriverConfig = serde_wasm_bindgen::from_value(config)?;
    let store = LocalStorageConfigStore::new(&window()?)?;
    ConfigService::new(store).save_driver_config(&config)?;
    Ok(())
}

/// The stored configuration, or defaults.
#[wasm_bindgen(js_name = loadConfig)]
pub fn load_config() -> Result<JsValue, JsError> {
    let window = window()?;
    to_js(&resolve_config(&window, JsValue::UNDEFINED)?)
}

struct Listeners {
    arena: Element,
    on_mouse_move: Closure<dyn FnMut(MouseEvent)>,
    observer: ResizeObserver,
    _on_resize: Closure<dyn FnMut(Array)>,
}

impl Listeners {
    fn install(driver: &Rc<BrowserDriver>, arena: &Element) -> Result<Self, HostError> {
        let on_mouse_move = {
            let driver = Rc::clone(driver);
            let arena = arena.clone();
            Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                let pointer = PointerEvent::client(
                    f64::from(event.client_x()),
                    f64::from(event.client_y()),
                );
                let arena_box = rect_to_box(&arena.get_bounding_client_rect());
                if let Err(err) = driver.handle_pointer_move(&pointer, &arena_box) {
                    warn!(%err, "pointer move not forwarded");
                }
            })
        };
        arena.add_event_listener_with_callback(
            "mousemove",
            on_mouse_move.as_ref().unchecked_ref(),
        )?;

        let on_resize = {
            let driver = Rc::clone(driver);
            let arena = arena.clone();
            Closure::<dyn FnMut(Array)>::new(move |_entries: Array| {
                let arena_box = rect_to_box(&arena.get_bounding_client_rect());
                if let Err(err) = driver.handle_resize(&arena_box) {
                    warn!(%err, "resize not forwarded");
                }
            })
        };
        let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref())?;
        observer.observe(arena);

        Ok(Self {
            arena: arena.clone(),
            on_mouse_move,
            observer,
            _on_resize: on_resize,
        })
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.observer.disconnect();
        let _ = self.arena.remove_event_listener_with_callback(
            "mousemove",
            self.on_mouse_move.as_ref().unchecked_ref(),
        );
    }
}

/// Browser entry point: one engine driven inside one arena element.
#[wasm_bindgen]
pub struct WasmDriver {
    driver: Rc<BrowserDriver>,
    running: Rc<Cell<bool>>,
    _listeners: Listeners,
}

#[wasm_bindgen]
impl WasmDriver {
    /// Bind `engine` to the arena element, initialise it and start listening
    /// for pointer and resize events.
    ///
    /// `config` may be omitted, in which case the stored configuration (or the
    /// defaults) is used.
    #[wasm_bindgen(constructor)]
    pub fn new(engine: JsEngine, config: JsValue) -> Result<WasmDriver, JsError> {
        let window = window()?;
        let config = resolve_config(&window, config)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        let arena = document
            .get_element_by_id(&config.arena_id)
            .ok_or_else(|| HostError::MissingArena(config.arena_id.clone()))?;
        let clock = BrowserClock::new(&window)?;

        let driver = Rc::new(ArenaDriver::new(
            JsEngineAdapter::new(engine),
            clock,
            config,
        )?);
        driver.init(&rect_to_box(&arena.get_bounding_client_rect()))?;
        let listeners = Listeners::install(&driver, &arena)?;
        Ok(WasmDriver {
            driver,
            running: Rc::new(Cell::new(false)),
            _listeners: listeners,
        })
    }

    /// Run the adaptive benchmark. Resolves with the final outcome once
    /// [`stop`](Self::stop) is called.
    #[wasm_bindgen(js_name = startBenchmark)]
    pub fn start_benchmark(&self) -> Result<Promise, JsError> {
        let guard = self.claim_loop()?;
        let driver = Rc::clone(&self.driver);
        Ok(future_to_promise(async move {
            let _guard = guard;
            let outcome = driver.run_benchmark().await.map_err(JsError::from)?;
            info!(entities = outcome.state.entities(), "benchmark finished");
            to_js(&outcome).map_err(JsValue::from)
        }))
    }

    /// Tick at the configured interval without spawning. Resolves with the
    /// run summary once stopped.
    #[wasm_bindgen(js_name = startFrames)]
    pub fn start_frames(&self) -> Result<Promise, JsError> {
        let guard = self.claim_loop()?;
        let driver = Rc::clone(&self.driver);
        Ok(future_to_promise(async move {
            let _guard = guard;
            let summary = driver.run_frames().await.map_err(JsError::from)?;
            to_js(&summary).map_err(JsValue::from)
        }))
    }

    /// Stop the running loop at its next iteration boundary. Final for this
    /// driver: later loops end immediately.
    pub fn stop(&self) {
        self.driver.stop_handle().stop();
    }

    /// Driver status (bounds, pointer, benchmark progress) as a plain object.
    pub fn status(&self) -> Result<JsValue, JsError> {
        to_js(&self.driver.status())
    }

    /// The engine's statistics text.
    pub fn statistics(&self) -> Result<String, JsError> {
        Ok(self.driver.statistics()?)
    }

    /// Forward a pointer position local to `target`, a descendant of the arena.
    /// Returns `false` when `target` is outside the arena.
    #[wasm_bindgen(js_name = pointerAt)]
    pub fn pointer_at(&self, target: Element, local_x: f64, local_y: f64) -> Result<bool, JsError> {
        Ok(self
            .driver
            .handle_nested_pointer_move(&ElementNode(target), local_x, local_y)?)
    }
}

impl WasmDriver {
    fn claim_loop(&self) -> Result<LoopGuard, HostError> {
        if self.running.replace(true) {
            return Err(HostError::AlreadyRunning);
        }
        Ok(LoopGuard(Rc::clone(&self.running)))
    }
}

impl Drop for WasmDriver {
    fn drop(&mut self) {
        self.driver.stop_handle().stop();
    }
}

/// Clears the running flag when the loop future finishes.
struct LoopGuard(Rc<Cell<bool>>);

impl Drop for LoopGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
