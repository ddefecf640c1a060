// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host-agnostic driver for a force-directed arena simulation.
//!
//! The simulation engine itself lives elsewhere (see [`SimulationEngine`]); this
//! crate owns everything around it:
//!
//! - [`FrameScheduler`]: cancellable fixed-interval tick loop.
//! - [`FpsEstimator`]: sliding-window frame rate.
//! - [`AdaptiveLoadController`]: grows entity count until fps hits the floor.
//! - [`ResizeSynchronizer`] / [`PointerTracker`]: DOM event forwarding.
//! - [`CoordinateResolver`]: nested element → arena-relative coordinates.
//! - [`ArenaDriver`]: the composition root used by hosts.
//!
//! Everything here is single-threaded and cooperative. Host adapters (the
//! browser crate, test doubles) plug in through the [`SimulationEngine`],
//! [`FrameClock`], [`DomNode`] and [`ConfigStore`] ports.

pub mod clock;
pub mod config;
pub mod controller;
pub mod coords;
pub mod driver;
pub mod engine;
pub mod fps;
pub mod pointer;
pub mod resize;
pub mod scheduler;
pub mod spawn;

pub use clock::FrameClock;
#[cfg(feature = "tokio-clock")]
pub use clock::TokioClock;
pub use config::{ConfigError, ConfigService, ConfigStore, DriverConfig, CONFIG_KEY};
pub use controller::{
    AdaptiveLoadController, BenchmarkOutcome, BenchmarkSnapshot, BenchmarkState, Phase,
};
pub use coords::{BoundingBox, CoordinateResolver, DomNode, Resolution};
pub use driver::{ArenaDriver, DriverError, DriverStatus};
pub use engine::{EngineCall, EngineError, SimulationEngine};
pub use fps::{FpsEstimate, FpsEstimator, DEFAULT_WINDOW_CAPACITY};
pub use pointer::{PointerEvent, PointerTracker};
pub use resize::{ArenaBounds, ResizeSynchronizer};
pub use scheduler::{stop_signal, FrameScheduler, FrameTick, RunSummary, StopHandle, StopSignal};
pub use spawn::{EntitySpawnRequest, SpawnTemplate, VisualPayload};
