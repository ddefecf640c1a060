// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Resize and pointer forwarding.

use fdg_driver::{
    BoundingBox, CoordinateResolver, EngineCall, PointerEvent, PointerTracker,
    ResizeSynchronizer, SimulationEngine,
};
use fdg_dry_tests::{FakeDom, RecordedCall, RecordingEngine};

fn engine() -> RecordingEngine {
    let mut engine = RecordingEngine::new();
    engine.init().unwrap();
    engine
}

#[test]
fn each_resize_forwards_exactly_one_call() {
    let mut engine = engine();
    let mut sync = ResizeSynchronizer::new();
    let rect = BoundingBox::new(0.0, 0.0, 800.0, 600.0);

    sync.on_resize(&rect, &mut engine).unwrap();
    assert_eq!(
        engine.calls_of(EngineCall::UpdateArenaSize),
        vec![RecordedCall::UpdateArenaSize {
            width: 800.0,
            height: 600.0
        }]
    );

    // identical observation: still forwarded, no coalescing
    sync.on_resize(&rect, &mut engine).unwrap();
    assert_eq!(engine.count(EngineCall::UpdateArenaSize), 2);
    assert_eq!(sync.forwarded(), 2);
}

#[test]
fn init_measurement_is_forwarded_and_remembered() {
    let mut engine = engine();
    let mut sync = ResizeSynchronizer::new();
    assert!(sync.bounds().is_none());
    let bounds = sync
        .on_init(&BoundingBox::new(8.0, 8.0, 320.0, 240.0), &mut engine)
        .unwrap();
    assert_eq!(sync.bounds(), Some(bounds));
    assert_eq!(bounds.width, 320.0);
}

#[test]
fn engine_failure_leaves_previous_bounds() {
    let mut engine = engine();
    let mut sync = ResizeSynchronizer::new();
    sync.on_init(&BoundingBox::new(0.0, 0.0, 10.0, 10.0), &mut engine)
        .unwrap();
    engine.fail_calls(EngineCall::UpdateArenaSize);
    assert!(sync
        .on_resize(&BoundingBox::new(0.0, 0.0, 20.0, 20.0), &mut engine)
        .is_err());
    assert_eq!(sync.bounds().map(|b| b.width), Some(10.0));
}

#[test]
fn pointer_is_arena_relative() {
    let mut engine = engine();
    let mut tracker = PointerTracker::new();
    let arena = BoundingBox::new(40.0, 25.0, 800.0, 600.0);

    let point = tracker
        .on_pointer_move(&PointerEvent::client(140.0, 75.0), &arena, &mut engine)
        .unwrap();
    assert_eq!(point, (100.0, 50.0));
    assert_eq!(
        engine.calls_of(EngineCall::UpdateMousePosition),
        vec![RecordedCall::UpdateMousePosition { x: 100.0, y: 50.0 }]
    );
    assert_eq!(tracker.last_position(), Some((100.0, 50.0)));
}

#[test]
fn nested_pointer_outside_arena_is_skipped() {
    let mut engine = engine();
    let mut tracker = PointerTracker::new();
    let dom = FakeDom::new();
    let stray = dom.root(Some("toolbar"), BoundingBox::new(0.0, 0.0, 10.0, 10.0));

    let forwarded = tracker
        .on_nested_pointer_move(
            &CoordinateResolver::new("arena"),
            &stray,
            1.0,
            1.0,
            &mut engine,
        )
        .unwrap();
    assert!(!forwarded);
    assert_eq!(engine.count(EngineCall::UpdateMousePosition), 0);
    assert!(tracker.last_position().is_none());
}

#[test]
fn nested_pointer_inside_arena_is_translated() {
    let mut engine = engine();
    let mut tracker = PointerTracker::new();
    let dom = FakeDom::new();
    let arena = dom.root(Some("arena"), BoundingBox::new(0.0, 0.0, 800.0, 600.0));
    let node = dom.child(&arena, None, BoundingBox::new(30.0, 40.0, 100.0, 20.0));

    assert!(tracker
        .on_nested_pointer_move(
            &CoordinateResolver::new("arena"),
            &node,
            2.0,
            3.0,
            &mut engine,
        )
        .unwrap());
    assert_eq!(tracker.last_position(), Some((32.0, 43.0)));
}
