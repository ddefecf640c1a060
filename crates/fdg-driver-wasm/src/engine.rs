// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The simulation engine as a JS object.
//!
//! The page hands over whatever object exposes the six engine entry points
//! (usually the engine's own wasm-bindgen module namespace). Thrown values are
//! turned into [`EngineError`]s naming the call that failed.

use fdg_driver::{EngineCall, EngineError, EntitySpawnRequest, SimulationEngine};
use js_sys::Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::describe;

#[wasm_bindgen]
extern "C" {
    /// Duck-typed engine handle supplied by the page.
    pub type JsEngine;

    #[wasm_bindgen(method, catch)]
    fn init(this: &JsEngine) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn update_mouse_position(this: &JsEngine, x: f64, y: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn spawn_entity(this: &JsEngine, request: &JsValue, labels: &Array) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn tick(this: &JsEngine) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn update_arena_size(this: &JsEngine, width: f64, height: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn print_arena_statistics(this: &JsEngine) -> Result<String, JsValue>;
}

/// Object handed to `spawn_entity`; labels travel separately as an array.
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct SpawnObject<'a> {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub w: f64,
    pub h: f64,
    pub payload: &'a str,
}

impl<'a> From<&'a EntitySpawnRequest> for SpawnObject<'a> {
    fn from(request: &'a EntitySpawnRequest) -> Self {
        Self {
            x: request.x,
            y: request.y,
            vx: request.vx,
            vy: request.vy,
            w: request.w,
            h: request.h,
            payload: request.payload.as_str(),
        }
    }
}

/// [`SimulationEngine`] backed by a [`JsEngine`].
pub struct JsEngineAdapter {
    inner: JsEngine,
}

impl JsEngineAdapter {
    /// Wrap a page-supplied engine object.
    pub fn new(inner: JsEngine) -> Self {
        Self { inner }
    }
}

fn engine_err(call: EngineCall) -> impl FnOnce(JsValue) -> EngineError {
    move |thrown| EngineError::new(call, describe(&thrown))
}

impl SimulationEngine for JsEngineAdapter {
    fn init(&mut self) -> Result<(), EngineError> {
        self.inner.init().map_err(engine_err(EngineCall::Init))
    }

    fn update_mouse_position(&mut self, x: f64, y: f64) -> Result<(), EngineError> {
        self.inner
            .update_mouse_position(x, y)
            .map_err(engine_err(EngineCall::UpdateMousePosition))
    }

    fn spawn_entity(&mut self, request: EntitySpawnRequest) -> Result<(), EngineError> {
        let object = SpawnObject::from(&request)
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| EngineError::new(EngineCall::SpawnEntity, err.to_string()))?;
        let labels: Array = request
            .labels
            .iter()
            .map(|label| JsValue::from_str(label))
            .collect();
        self.inner
            .spawn_entity(&object, &labels)
            .map_err(engine_err(EngineCall::SpawnEntity))
    }

    fn tick(&mut self) -> Result<(), EngineError> {
        self.inner.tick().map_err(engine_err(EngineCall::Tick))
    }

    fn update_arena_size(&mut self, width: f64, height: f64) -> Result<(), EngineError> {
        self.inner
            .update_arena_size(width, height)
            .map_err(engine_err(EngineCall::UpdateArenaSize))
    }

    fn print_arena_statistics(&self) -> String {
        self.inner
            .print_arena_statistics()
            .unwrap_or_else(|thrown| format!("statistics unavailable: {}", describe(&thrown)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdg_driver::SpawnTemplate;

    #[test]
    fn spawn_object_carries_geometry_and_payload() {
        let mut request = SpawnTemplate::default().instantiate();
        request.x = 12.0;
        request.vy = -3.5;
        request.labels.insert("greeeeeen".into());
        let json = serde_json::to_value(SpawnObject::from(&request)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "x": 12.0, "y": 0.0, "vx": 0.0, "vy": -3.5,
                "w": 100.0, "h": 100.0, "payload": "<div></div>"
            })
        );
    }
}
