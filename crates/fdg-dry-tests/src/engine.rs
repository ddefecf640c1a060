// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording engine double.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use fdg_driver::{EngineCall, EngineError, EntitySpawnRequest, SimulationEngine, StopHandle};

use crate::clock::ManualClock;

/// One call as the engine saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// `init()`
    Init,
    /// `update_mouse_position(x, y)`
    UpdateMousePosition {
        /// Arena-relative pointer x (px).
        x: f64,
        /// Arena-relative pointer y (px).
        y: f64,
    },
    /// `spawn_entity(request)`
    SpawnEntity(EntitySpawnRequest),
    /// `tick()`
    Tick,
    /// `update_arena_size(w, h)`
    UpdateArenaSize {
        /// Forwarded arena width (px).
        width: f64,
        /// Forwarded arena height (px).
        height: f64,
    },
}

impl RecordedCall {
    /// Which entry point this call hit.
    pub fn kind(&self) -> EngineCall {
        match self {
            Self::Init => EngineCall::Init,
            Self::UpdateMousePosition { .. } => EngineCall::UpdateMousePosition,
            Self::SpawnEntity(_) => EngineCall::SpawnEntity,
            Self::Tick => EngineCall::Tick,
            Self::UpdateArenaSize { .. } => EngineCall::UpdateArenaSize,
        }
    }
}

struct TickCost {
    clock: ManualClock,
    base_ms: f64,
    per_entity_ms: f64,
}

#[derive(Default)]
struct Inner {
    calls: Vec<RecordedCall>,
    initialized: bool,
    entities: u64,
    ticks: u64,
    arena: Option<(f64, f64)>,
    failing: HashSet<EngineCall>,
    failing_ticks: BTreeSet<u64>,
    tick_cost: Option<TickCost>,
    stop_after: Option<(u64, StopHandle)>,
}

/// Engine double that records every call.
///
/// Calls other than `init` fail until `init` has been called, mirroring the
/// real engine's contract. Clones share state, so a test can keep one clone
/// while the driver owns the other.
///
/// Optional behaviours:
/// - [`fail_calls`](Self::fail_calls) / [`fail_tick`](Self::fail_tick): inject errors.
/// - [`simulate_load`](Self::simulate_load): each tick advances a
///   [`ManualClock`] by `base + per_entity * entities`, so fps falls as the
///   benchmark spawns.
/// - [`stop_after_ticks`](Self::stop_after_ticks): raise a stop handle after N ticks.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    inner: Rc<RefCell<Inner>>,
}

impl RecordingEngine {
    /// Fresh engine with no calls recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of `kind` fail.
    pub fn fail_calls(&self, kind: EngineCall) -> &Self {
        self.inner.borrow_mut().failing.insert(kind);
        self
    }

    /// Make the tick with zero-based index `index` fail.
    pub fn fail_tick(&self, index: u64) -> &Self {
        self.inner.borrow_mut().failing_ticks.insert(index);
        self
    }

    /// Charge simulated work for every tick against `clock`.
    pub fn simulate_load(&self, clock: &ManualClock, base_ms: f64, per_entity_ms: f64) -> &Self {
        self.inner.borrow_mut().tick_cost = Some(TickCost {
            clock: clock.clone(),
            base_ms,
            per_entity_ms,
        });
        self
    }

    /// Raise `handle` once `ticks` ticks have been seen.
    pub fn stop_after_ticks(&self, ticks: u64, handle: StopHandle) -> &Self {
        self.inner.borrow_mut().stop_after = Some((ticks, handle));
        self
    }

    /// All calls, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.borrow().calls.clone()
    }

    /// Calls of one kind.
    pub fn calls_of(&self, kind: EngineCall) -> Vec<RecordedCall> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|c| c.kind() == kind)
            .cloned()
            .collect()
    }

    /// Number of calls of one kind.
    pub fn count(&self, kind: EngineCall) -> usize {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|c| c.kind() == kind)
            .count()
    }

    /// Entities accepted so far.
    pub fn entities(&self) -> u64 {
        self.inner.borrow().entities
    }

    fn enter(&self, call: RecordedCall) -> Result<(), EngineError> {
        let kind = call.kind();
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(call);
        if kind != EngineCall::Init && !inner.initialized {
            return Err(EngineError::new(kind, "engine not initialized"));
        }
        if inner.failing.contains(&kind) {
            return Err(EngineError::new(kind, "injected failure"));
        }
        Ok(())
    }
}

impl SimulationEngine for RecordingEngine {
    fn init(&mut self) -> Result<(), EngineError> {
        self.enter(RecordedCall::Init)?;
        let mut inner = self.inner.borrow_mut();
        inner.initialized = true;
        inner.entities = 0;
        inner.ticks = 0;
        Ok(())
    }

    fn update_mouse_position(&mut self, x: f64, y: f64) -> Result<(), EngineError> {
        self.enter(RecordedCall::UpdateMousePosition { x, y })
    }

    fn spawn_entity(&mut self, request: EntitySpawnRequest) -> Result<(), EngineError> {
        self.enter(RecordedCall::SpawnEntity(request))?;
        self.inner.borrow_mut().entities += 1;
        Ok(())
    }

    fn tick(&mut self) -> Result<(), EngineError> {
        self.enter(RecordedCall::Tick)?;
        let mut inner = self.inner.borrow_mut();
        let index = inner.ticks;
        inner.ticks += 1;
        if let Some(cost) = &inner.tick_cost {
            #[allow(clippy::cast_precision_loss)]
            let entities = inner.entities as f64;
            cost.clock.advance(cost.base_ms + cost.per_entity_ms * entities);
        }
        if let Some((after, handle)) = &inner.stop_after {
            if inner.ticks >= *after {
                handle.stop();
            }
        }
        if inner.failing_ticks.contains(&index) {
            return Err(EngineError::new(EngineCall::Tick, "injected tick failure"));
        }
        Ok(())
    }

    fn update_arena_size(&mut self, width: f64, height: f64) -> Result<(), EngineError> {
        self.enter(RecordedCall::UpdateArenaSize { width, height })?;
        self.inner.borrow_mut().arena = Some((width, height));
        Ok(())
    }

    fn print_arena_statistics(&self) -> String {
        let inner = self.inner.borrow();
        match inner.arena {
            Some((w, h)) => format!("Width {w}\nHeight {h}\nEntities {}", inner.entities),
            None => String::from("Arena not initialized"),
        }
    }
}
