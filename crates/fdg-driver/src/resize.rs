// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Arena size forwarding.
//!
//! Every observation produces exactly one `update_arena_size` call. There is
//! no debouncing: the engine is expected to treat resizes as cheap and
//! idempotent.

use serde::Serialize;
use tracing::debug;

use crate::coords::BoundingBox;
use crate::engine::{EngineError, SimulationEngine};

/// Arena dimensions last pushed to the engine. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ArenaBounds {
    /// Width (px).
    pub width: f64,
    /// Height (px).
    pub height: f64,
}

impl ArenaBounds {
    /// Bounds from a measured box; negative or non-finite sizes become 0.
    pub fn from_box(rect: &BoundingBox) -> Self {
        Self {
            width: non_negative(rect.width),
            height: non_negative(rect.height),
        }
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

/// Keeps the engine's containment bounds in sync with the arena container.
#[derive(Debug, Default)]
pub struct ResizeSynchronizer {
    bounds: Option<ArenaBounds>,
    forwarded: u64,
}

impl ResizeSynchronizer {
    /// New synchroniser with nothing forwarded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Startup measurement.
    pub fn on_init<E: SimulationEngine + ?Sized>(
        &mut self,
        rect: &BoundingBox,
        engine: &mut E,
    ) -> Result<ArenaBounds, EngineError> {
        self.forward(rect, engine)
    }

    /// A resize observation.
    pub fn on_resize<E: SimulationEngine + ?Sized>(
        &mut self,
        rect: &BoundingBox,
        engine: &mut E,
    ) -> Result<ArenaBounds, EngineError> {
        self.forward(rect, engine)
    }

    /// Bounds last forwarded, if any.
    pub fn bounds(&self) -> Option<ArenaBounds> {
        self.bounds
    }

    /// Number of `update_arena_size` calls issued.
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    fn forward<E: SimulationEngine + ?Sized>(
        &mut self,
        rect: &BoundingBox,
        engine: &mut E,
    ) -> Result<ArenaBounds, EngineError> {
        let bounds = ArenaBounds::from_box(rect);
        self.forwarded += 1;
        engine.update_arena_size(bounds.width, bounds.height)?;
        debug!(width = bounds.width, height = bounds.height, "arena resized");
        self.bounds = Some(bounds);
        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_negative_and_nan() {
        let b = ArenaBounds::from_box(&BoundingBox::new(0.0, 0.0, -3.0, f64::NAN));
        assert_eq!(
            b,
            ArenaBounds {
                width: 0.0,
                height: 0.0
            }
        );
    }
}
