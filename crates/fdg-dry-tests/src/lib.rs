// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles for the arena driver.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`clock`] - Manual clock that advances only when told (or when slept on)
//! - [`config`] - In-memory config store fake for testing without host storage
//! - [`dom`] - Fake element tree implementing `DomNode`
//! - [`engine`] - Recording engine with failure injection and simulated tick cost

pub mod clock;
pub mod config;
pub mod dom;
pub mod engine;

pub use clock::ManualClock;
pub use config::InMemoryConfigStore;
pub use dom::{FakeDom, FakeNode};
pub use engine::{RecordedCall, RecordingEngine};
