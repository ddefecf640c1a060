// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Composition root: one engine, one arena, one frame loop.
//!
//! `ArenaDriver` owns every piece of mutable driver state (no globals) and is
//! shared by reference between the host's event handlers and the frame-loop
//! future. All methods take `&self`; interior borrows never span an `.await`.

use std::cell::{Cell, RefCell};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::clock::FrameClock;
use crate::config::{ConfigError, DriverConfig};
use crate::controller::{AdaptiveLoadController, BenchmarkOutcome, BenchmarkSnapshot};
use crate::coords::{BoundingBox, CoordinateResolver, DomNode};
use crate::engine::{EngineError, SimulationEngine};
use crate::pointer::{PointerEvent, PointerTracker};
use crate::resize::{ArenaBounds, ResizeSynchronizer};
use crate::scheduler::{stop_signal, FrameScheduler, RunSummary, StopHandle};

/// Errors surfaced by [`ArenaDriver`].
#[derive(Debug, Error)]
pub enum DriverError {
    /// An operation ran before [`ArenaDriver::init`].
    #[error("driver not initialized: call init() first")]
    NotInitialized,
    /// An engine entry point failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Configuration was rejected.
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

/// Host-facing snapshot of the driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStatus {
    /// `init` completed.
    pub initialized: bool,
    /// The stop handle fired.
    pub stopped: bool,
    /// Bounds last forwarded to the engine.
    pub bounds: Option<ArenaBounds>,
    /// Pointer position last forwarded to the engine.
    pub pointer: Option<(f64, f64)>,
    /// Latest benchmark progress, once a benchmark started.
    pub benchmark: Option<BenchmarkSnapshot>,
}

/// Drives an engine inside one arena container.
pub struct ArenaDriver<E, C> {
    engine: RefCell<E>,
    clock: C,
    config: DriverConfig,
    resolver: CoordinateResolver,
    resize: RefCell<ResizeSynchronizer>,
    pointer: RefCell<PointerTracker>,
    stop: StopHandle,
    benchmark: RefCell<Option<watch::Receiver<BenchmarkSnapshot>>>,
    initialized: Cell<bool>,
}

impl<E, C> ArenaDriver<E, C>
where
    E: SimulationEngine,
    C: FrameClock + Clone,
{
    /// Wrap `engine` after validating `config`. The engine is not touched yet.
    pub fn new(engine: E, clock: C, config: DriverConfig) -> Result<Self, DriverError> {
        config.validate()?;
        let (stop, _) = stop_signal();
        Ok(Self {
            engine: RefCell::new(engine),
            clock,
            resolver: CoordinateResolver::new(config.arena_id.clone()),
            config,
            resize: RefCell::new(ResizeSynchronizer::new()),
            pointer: RefCell::new(PointerTracker::new()),
            stop,
            benchmark: RefCell::new(None),
            initialized: Cell::new(false),
        })
    }

    /// Initialise the engine, push the arena size, then spawn the configured
    /// start-up entities.
    pub fn init(&self, arena: &BoundingBox) -> Result<ArenaBounds, DriverError> {
        self.initialized.set(false);
        let mut engine = self.engine.borrow_mut();
        engine.init()?;
        let bounds = self.resize.borrow_mut().on_init(arena, &mut *engine)?;
        for request in &self.config.initial_spawns {
            engine.spawn_entity(request.clone())?;
        }
        // only a complete start-up unlocks the other operations
        self.initialized.set(true);
        info!(
            arena = %self.config.arena_id,
            width = bounds.width,
            height = bounds.height,
            seeded = self.config.initial_spawns.len(),
            "driver initialized"
        );
        Ok(bounds)
    }

    /// Forward a resize observation.
    pub fn handle_resize(&self, arena: &BoundingBox) -> Result<ArenaBounds, DriverError> {
        self.ensure_initialized()?;
        let mut engine = self.engine.borrow_mut();
        Ok(self.resize.borrow_mut().on_resize(arena, &mut *engine)?)
    }

    /// Forward a pointer move measured in client coordinates.
    pub fn handle_pointer_move(
        &self,
        event: &PointerEvent,
        arena: &BoundingBox,
    ) -> Result<(f64, f64), DriverError> {
        self.ensure_initialized()?;
        let mut engine = self.engine.borrow_mut();
        Ok(self
            .pointer
            .borrow_mut()
            .on_pointer_move(event, arena, &mut *engine)?)
    }

    /// Forward a pointer move local to a nested element; `false` if the
    /// element is outside the arena.
    pub fn handle_nested_pointer_move<N: DomNode>(
        &self,
        target: &N,
        local_x: f64,
        local_y: f64,
    ) -> Result<bool, DriverError> {
        self.ensure_initialized()?;
        let mut engine = self.engine.borrow_mut();
        Ok(self.pointer.borrow_mut().on_nested_pointer_move(
            &self.resolver,
            target,
            local_x,
            local_y,
            &mut *engine,
        )?)
    }

    /// Run the adaptive benchmark until [`stop_handle`](Self::stop_handle) fires.
    pub async fn run_benchmark(&self) -> Result<BenchmarkOutcome, DriverError> {
        self.ensure_initialized()?;
        let controller = AdaptiveLoadController::new(&self.config)?;
        self.benchmark.replace(Some(controller.subscribe()));
        let mut scheduler = self.scheduler();
        Ok(controller.run(&mut scheduler, &self.engine).await)
    }

    /// Tick the engine at the configured interval, without load generation,
    /// until stopped.
    pub async fn run_frames(&self) -> Result<RunSummary, DriverError> {
        self.ensure_initialized()?;
        let mut scheduler = self.scheduler();
        Ok(scheduler.run(|_| self.engine.borrow_mut().tick()).await)
    }

    /// Handle that stops whichever loop is running.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Engine statistics text.
    pub fn statistics(&self) -> Result<String, DriverError> {
        self.ensure_initialized()?;
        Ok(self.engine.borrow().print_arena_statistics())
    }

    /// Current status for display.
    pub fn status(&self) -> DriverStatus {
        DriverStatus {
            initialized: self.initialized.get(),
            stopped: self.stop.is_stopped(),
            bounds: self.resize.borrow().bounds(),
            pointer: self.pointer.borrow().last_position(),
            benchmark: self
                .benchmark
                .borrow()
                .as_ref()
                .map(|rx| rx.borrow().clone()),
        }
    }

    /// Validated configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    fn scheduler(&self) -> FrameScheduler<C> {
        FrameScheduler::new(
            self.clock.clone(),
            self.config.frame_interval_ms,
            self.stop.signal(),
        )
    }

    fn ensure_initialized(&self) -> Result<(), DriverError> {
        if self.initialized.get() {
            Ok(())
        } else {
            warn!("driver used before init");
            Err(DriverError::NotInitialized)
        }
    }
}
