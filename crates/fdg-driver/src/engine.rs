// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port to the external simulation engine.

use std::fmt;

use thiserror::Error;

use crate::spawn::EntitySpawnRequest;

/// Engine entry points, used to label failures and recorded calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCall {
    /// `init()`
    Init,
    /// `update_mouse_position(x, y)`
    UpdateMousePosition,
    /// `spawn_entity(request)`
    SpawnEntity,
    /// `tick()`
    Tick,
    /// `update_arena_size(w, h)`
    UpdateArenaSize,
}

impl EngineCall {
    /// Name of the entry point as the engine exports it.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::UpdateMousePosition => "update_mouse_position",
            Self::SpawnEntity => "spawn_entity",
            Self::Tick => "tick",
            Self::UpdateArenaSize => "update_arena_size",
        }
    }
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An engine entry point signalled failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("engine call `{call}` failed: {reason}")]
pub struct EngineError {
    /// Which entry point failed.
    pub call: EngineCall,
    /// Engine-supplied description.
    pub reason: String,
}

impl EngineError {
    /// Build an error for `call`.
    pub fn new(call: EngineCall, reason: impl Into<String>) -> Self {
        Self {
            call,
            reason: reason.into(),
        }
    }
}

/// The simulation engine as seen by the driver.
///
/// All calls are synchronous and must not block: the driver runs on a single
/// cooperative thread, so a stalled call stalls tick, pointer and resize
/// handling alike. [`init`](Self::init) must be called once before anything
/// else; [`ArenaDriver`](crate::ArenaDriver) enforces that ordering.
pub trait SimulationEngine {
    /// (Re)initialise engine state.
    fn init(&mut self) -> Result<(), EngineError>;

    /// Record the last known pointer position, in arena-relative coordinates.
    fn update_mouse_position(&mut self, x: f64, y: f64) -> Result<(), EngineError>;

    /// Create one entity. The request is moved into the engine.
    fn spawn_entity(&mut self, request: EntitySpawnRequest) -> Result<(), EngineError>;

    /// Advance the simulation by one discrete step.
    fn tick(&mut self) -> Result<(), EngineError>;

    /// Update the containment bounds. Dimensions are non-negative.
    fn update_arena_size(&mut self, width: f64, height: f64) -> Result<(), EngineError>;

    /// Textual snapshot of engine state for display.
    fn print_arena_statistics(&self) -> String;
}
