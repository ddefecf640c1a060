// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pointer forwarding in arena-relative coordinates.
//!
//! The engine works in the arena's own coordinate space. Page (client)
//! coordinates are always converted by subtracting the arena's origin before
//! they are forwarded.

use serde::{Deserialize, Serialize};

use crate::coords::{BoundingBox, CoordinateResolver, DomNode, Resolution};
use crate::engine::{EngineError, SimulationEngine};

/// A pointer movement in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// `clientX`
    pub client_x: f64,
    /// `clientY`
    pub client_y: f64,
}

impl PointerEvent {
    /// Event at client position `(x, y)`.
    pub const fn client(x: f64, y: f64) -> Self {
        Self {
            client_x: x,
            client_y: y,
        }
    }
}

/// Forwards pointer positions to `update_mouse_position`.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last: Option<(f64, f64)>,
}

impl PointerTracker {
    /// Tracker with no position yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward `event`, measured against the arena's current box.
    pub fn on_pointer_move<E: SimulationEngine + ?Sized>(
        &mut self,
        event: &PointerEvent,
        arena: &BoundingBox,
        engine: &mut E,
    ) -> Result<(f64, f64), EngineError> {
        let point = (event.client_x - arena.left, event.client_y - arena.top);
        self.forward(point, engine)?;
        Ok(point)
    }

    /// Forward a point local to `target`, a possibly nested element.
    ///
    /// Returns `Ok(false)` (nothing forwarded) when `target` is not inside the
    /// arena.
    pub fn on_nested_pointer_move<N, E>(
        &mut self,
        resolver: &CoordinateResolver,
        target: &N,
        local_x: f64,
        local_y: f64,
        engine: &mut E,
    ) -> Result<bool, EngineError>
    where
        N: DomNode,
        E: SimulationEngine + ?Sized,
    {
        match resolver.resolve_to_arena(local_x, local_y, target) {
            Resolution::Found { x, y } => {
                self.forward((x, y), engine)?;
                Ok(true)
            }
            Resolution::NotFound => Ok(false),
        }
    }

    /// Last position accepted by the engine.
    pub fn last_position(&self) -> Option<(f64, f64)> {
        self.last
    }

    fn forward<E: SimulationEngine + ?Sized>(
        &mut self,
        (x, y): (f64, f64),
        engine: &mut E,
    ) -> Result<(), EngineError> {
        engine.update_mouse_position(x, y)?;
        self.last = Some((x, y));
        Ok(())
    }
}
