// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Adaptive benchmark: grow entity count until throughput hits the floor.
//!
//! The controller is a one-way admission loop. While `Growing`, every batch
//! spawns one entity from the template, drives the scheduler for `batch_size`
//! ticks and then compares the fps estimate with the floor. The first batch
//! whose estimate is at or below the floor flips the phase to `Steady`; the
//! entity spawned in that batch is kept. `Steady` keeps ticking without
//! spawning until the stop signal fires.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::clock::FrameClock;
use crate::config::{ConfigError, DriverConfig};
use crate::engine::SimulationEngine;
use crate::fps::{FpsEstimate, FpsEstimator};
use crate::scheduler::{FrameScheduler, FrameTick, RunSummary};
use crate::spawn::SpawnTemplate;

/// Controller phase. `Growing → Steady` happens at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Spawning one entity per batch.
    Growing,
    /// Floor reached; no further spawns.
    Steady,
}

/// Counter, last estimate and phase of one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkState {
    entities: u64,
    fps: FpsEstimate,
    phase: Phase,
}

impl Default for BenchmarkState {
    fn default() -> Self {
        Self {
            entities: 0,
            fps: FpsEstimate::Unknown,
            phase: Phase::Growing,
        }
    }
}

impl BenchmarkState {
    /// Entities spawned so far. Never decreases.
    pub fn entities(&self) -> u64 {
        self.entities
    }

    /// Estimate read at the end of the last batch.
    pub fn fps(&self) -> FpsEstimate {
        self.fps
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// Progress published after every batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSnapshot {
    /// Entities spawned so far.
    pub entities: u64,
    /// Last estimate, `None` while unknown.
    pub fps: Option<f64>,
    /// Current phase.
    pub phase: Phase,
    /// Batches evaluated.
    pub batches: u64,
    /// Ticks driven across all batches.
    pub ticks: u64,
    /// Ticks whose engine call failed.
    pub failed_ticks: u64,
}

/// Final state of a benchmark run that was stopped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkOutcome {
    /// State at the moment the run ended.
    pub state: BenchmarkState,
    /// Batches evaluated.
    pub batches: u64,
    /// Combined scheduler summary.
    pub summary: RunSummary,
}

/// Closed-loop load generator on top of [`FrameScheduler`].
pub struct AdaptiveLoadController {
    batch_size: u64,
    fps_floor: f64,
    max_entities: Option<u64>,
    template: SpawnTemplate,
    fps: FpsEstimator,
    state: BenchmarkState,
    batches: u64,
    totals: RunSummary,
    status: watch::Sender<BenchmarkSnapshot>,
}

impl AdaptiveLoadController {
    /// Build a controller; `config` is validated first, so a zero batch size
    /// or a window too small to estimate from is rejected here.
    pub fn new(config: &DriverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = BenchmarkState::default();
        let (status, _) = watch::channel(BenchmarkSnapshot {
            entities: 0,
            fps: None,
            phase: state.phase,
            batches: 0,
            ticks: 0,
            failed_ticks: 0,
        });
        Ok(Self {
            batch_size: config.batch_size,
            fps_floor: config.fps_floor,
            max_entities: config.max_entities,
            template: config.spawn_template.clone(),
            fps: FpsEstimator::new(config.window_capacity),
            state,
            batches: 0,
            totals: RunSummary::default(),
            status,
        })
    }

    /// Observe progress snapshots.
    pub fn subscribe(&self) -> watch::Receiver<BenchmarkSnapshot> {
        self.status.subscribe()
    }

    /// Current benchmark state.
    pub fn state(&self) -> &BenchmarkState {
        &self.state
    }

    /// Batches evaluated so far.
    pub fn batches(&self) -> u64 {
        self.batches
    }

    /// Start a batch: while growing, spawn one entity from the template.
    ///
    /// Returns `true` if a spawn was issued and accepted. A rejected spawn is
    /// logged and leaves the counter untouched.
    pub fn begin_batch<E: SimulationEngine + ?Sized>(&mut self, engine: &mut E) -> bool {
        if self.state.phase != Phase::Growing {
            return false;
        }
        match engine.spawn_entity(self.template.instantiate()) {
            Ok(()) => {
                self.state.entities += 1;
                debug!(entities = self.state.entities, "spawned benchmark entity");
                true
            }
            Err(err) => {
                warn!(%err, "benchmark spawn rejected");
                false
            }
        }
    }

    /// Feed one tick timestamp into the estimator.
    pub fn record_tick(&mut self, tick: &FrameTick) {
        self.fps.record(tick.timestamp_ms);
    }

    /// End a batch using the controller's own estimate.
    pub fn finish_batch(&mut self) -> Phase {
        let estimate = self.fps.estimate();
        self.evaluate(estimate)
    }

    /// Apply the admission rule to `estimate` and return the resulting phase.
    ///
    /// `Unknown` keeps growing; a known value at or below the floor (or an
    /// exhausted entity cap) settles the run.
    pub fn evaluate(&mut self, estimate: FpsEstimate) -> Phase {
        self.batches += 1;
        self.state.fps = estimate;
        if self.state.phase == Phase::Growing {
            let capped = self
                .max_entities
                .is_some_and(|max| self.state.entities >= max);
            if estimate.at_or_below(self.fps_floor) || capped {
                self.state.phase = Phase::Steady;
                info!(
                    entities = self.state.entities,
                    fps = ?estimate.value(),
                    floor = self.fps_floor,
                    capped,
                    "benchmark settled"
                );
            }
        }
        self.publish();
        self.state.phase
    }

    /// Drive the benchmark until the scheduler's stop signal fires.
    ///
    /// Engine borrows are scoped to single calls, so pointer and resize
    /// handlers may use the same engine between ticks.
    pub async fn run<C, E>(
        mut self,
        scheduler: &mut FrameScheduler<C>,
        engine: &RefCell<E>,
    ) -> BenchmarkOutcome
    where
        C: FrameClock,
        E: SimulationEngine + ?Sized,
    {
        info!(
            batch_size = self.batch_size,
            floor = self.fps_floor,
            interval_ms = scheduler.interval_ms(),
            "benchmark started"
        );
        loop {
            if scheduler.is_stopped() {
                self.totals.stopped = true;
                self.publish();
                break;
            }
            self.begin_batch(&mut *engine.borrow_mut());
            let batch_size = self.batch_size;
            let batch = scheduler
                .run_batch(batch_size, |tick| {
                    self.record_tick(&tick);
                    engine.borrow_mut().tick()
                })
                .await;
            self.totals.absorb(batch);
            if batch.stopped {
                self.publish();
                break;
            }
            self.finish_batch();
        }
        info!(
            entities = self.state.entities,
            phase = ?self.state.phase,
            ticks = self.totals.ticks,
            "benchmark stopped"
        );
        BenchmarkOutcome {
            state: self.state,
            batches: self.batches,
            summary: self.totals,
        }
    }

    fn publish(&self) {
        self.status.send_replace(BenchmarkSnapshot {
            entities: self.state.entities,
            fps: self.state.fps.value(),
            phase: self.state.phase,
            batches: self.batches,
            ticks: self.totals.ticks,
            failed_ticks: self.totals.failed_ticks,
        });
    }
}
