// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! `ArenaDriver` end to end with recording doubles.

use fdg_driver::{
    ArenaDriver, BoundingBox, DriverConfig, DriverError, EngineCall, EntitySpawnRequest, Phase,
    PointerEvent, SpawnTemplate,
};
use fdg_dry_tests::{FakeDom, ManualClock, RecordedCall, RecordingEngine};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn arena() -> BoundingBox {
    BoundingBox::new(40.0, 25.0, 800.0, 600.0)
}

fn driver(config: DriverConfig) -> (ArenaDriver<RecordingEngine, ManualClock>, RecordingEngine) {
    let engine = RecordingEngine::new();
    let driver = ArenaDriver::new(engine.clone(), ManualClock::new(), config).unwrap();
    (driver, engine)
}

#[test]
fn init_orders_engine_calls() {
    init_tracing();
    let seed = EntitySpawnRequest {
        x: 10.0,
        y: 20.0,
        ..SpawnTemplate::default().instantiate()
    };
    let (driver, engine) = driver(DriverConfig {
        initial_spawns: vec![seed.clone(), seed.clone()],
        ..DriverConfig::default()
    });

    let bounds = driver.init(&arena()).unwrap();
    assert_eq!((bounds.width, bounds.height), (800.0, 600.0));
    assert_eq!(
        engine.calls(),
        vec![
            RecordedCall::Init,
            RecordedCall::UpdateArenaSize {
                width: 800.0,
                height: 600.0
            },
            RecordedCall::SpawnEntity(seed.clone()),
            RecordedCall::SpawnEntity(seed),
        ]
    );
    assert_eq!(engine.entities(), 2);
}

#[test]
fn operations_before_init_are_refused() {
    let (driver, engine) = driver(DriverConfig::default());
    assert!(matches!(
        driver.handle_resize(&arena()),
        Err(DriverError::NotInitialized)
    ));
    assert!(matches!(
        driver.handle_pointer_move(&PointerEvent::client(1.0, 1.0), &arena()),
        Err(DriverError::NotInitialized)
    ));
    assert!(matches!(driver.statistics(), Err(DriverError::NotInitialized)));
    assert!(engine.calls().is_empty());
    assert!(!driver.status().initialized);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let result = ArenaDriver::new(
        RecordingEngine::new(),
        ManualClock::new(),
        DriverConfig {
            window_capacity: 1,
            ..DriverConfig::default()
        },
    );
    assert!(matches!(result, Err(DriverError::Config(_))));
}

#[test]
fn failing_init_leaves_driver_uninitialized() {
    let (driver, engine) = driver(DriverConfig::default());
    engine.fail_calls(EngineCall::Init);
    assert!(matches!(driver.init(&arena()), Err(DriverError::Engine(_))));
    assert!(!driver.status().initialized);
}

#[test]
fn failed_arena_size_push_aborts_startup() {
    let (driver, engine) = driver(DriverConfig::default());
    engine.fail_calls(EngineCall::UpdateArenaSize);
    assert!(matches!(driver.init(&arena()), Err(DriverError::Engine(_))));

    let status = driver.status();
    assert!(!status.initialized);
    assert!(status.bounds.is_none());
    assert!(matches!(
        driver.handle_pointer_move(&PointerEvent::client(41.0, 26.0), &arena()),
        Err(DriverError::NotInitialized)
    ));
    assert_eq!(engine.count(EngineCall::UpdateMousePosition), 0);
}

#[tokio::test]
async fn failed_seed_spawn_aborts_startup() {
    let (driver, engine) = driver(DriverConfig {
        initial_spawns: vec![SpawnTemplate::default().instantiate()],
        ..DriverConfig::default()
    });
    engine.fail_calls(EngineCall::SpawnEntity);
    assert!(matches!(driver.init(&arena()), Err(DriverError::Engine(_))));

    assert!(!driver.status().initialized);
    assert!(matches!(
        driver.handle_resize(&arena()),
        Err(DriverError::NotInitialized)
    ));
    assert!(matches!(
        driver.run_frames().await,
        Err(DriverError::NotInitialized)
    ));
    assert_eq!(engine.count(EngineCall::Tick), 0);
}

#[test]
fn status_and_statistics_reflect_forwarded_events() {
    let (driver, _engine) = driver(DriverConfig::default());
    driver.init(&arena()).unwrap();
    driver
        .handle_resize(&BoundingBox::new(40.0, 25.0, 1024.0, 768.0))
        .unwrap();
    let pos = driver
        .handle_pointer_move(&PointerEvent::client(140.0, 75.0), &arena())
        .unwrap();
    assert_eq!(pos, (100.0, 50.0));

    let status = driver.status();
    assert!(status.initialized);
    assert!(!status.stopped);
    assert_eq!(status.pointer, Some((100.0, 50.0)));
    assert_eq!(status.bounds.map(|b| b.width), Some(1024.0));
    assert!(status.benchmark.is_none());

    assert_eq!(
        driver.statistics().unwrap(),
        "Width 1024\nHeight 768\nEntities 0"
    );
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["initialized"], true);
    assert!(json.get("benchmark").is_some());
}

#[test]
fn nested_pointer_uses_configured_arena_id() {
    let (driver, engine) = driver(DriverConfig {
        arena_id: "stage".into(),
        ..DriverConfig::default()
    });
    driver.init(&arena()).unwrap();

    let dom = FakeDom::new();
    let stage = dom.root(Some("stage"), BoundingBox::new(40.0, 25.0, 800.0, 600.0));
    let card = dom.child(&stage, None, BoundingBox::new(12.0, 18.0, 50.0, 50.0));
    assert!(driver.handle_nested_pointer_move(&card, 3.0, 4.0).unwrap());
    assert_eq!(
        engine.calls_of(EngineCall::UpdateMousePosition),
        vec![RecordedCall::UpdateMousePosition { x: 15.0, y: 22.0 }]
    );

    let stray = dom.root(Some("arena"), BoundingBox::default());
    assert!(!driver.handle_nested_pointer_move(&stray, 3.0, 4.0).unwrap());
    assert_eq!(engine.count(EngineCall::UpdateMousePosition), 1);
}

#[tokio::test]
async fn run_frames_ticks_until_stopped() {
    init_tracing();
    let (driver, engine) = driver(DriverConfig::default());
    driver.init(&arena()).unwrap();
    engine.stop_after_ticks(25, driver.stop_handle());

    let summary = driver.run_frames().await.unwrap();
    assert_eq!(summary.ticks, 25);
    assert!(summary.stopped);
    assert!(driver.status().stopped);
    assert_eq!(engine.count(EngineCall::Tick), 25);
}

#[tokio::test]
async fn run_benchmark_publishes_progress() {
    let clock = ManualClock::new();
    let engine = RecordingEngine::new();
    let driver = ArenaDriver::new(
        engine.clone(),
        clock.clone(),
        DriverConfig {
            batch_size: 10,
            window_capacity: 10,
            ..DriverConfig::default()
        },
    )
    .unwrap();
    driver.init(&arena()).unwrap();
    engine
        .simulate_load(&clock, 0.0, 5.0)
        .stop_after_ticks(200, driver.stop_handle());

    let outcome = driver.run_benchmark().await.unwrap();
    assert_eq!(outcome.state.phase(), Phase::Steady);
    assert_eq!(outcome.state.entities(), 5);

    let snap = driver.status().benchmark.unwrap();
    assert_eq!(snap.entities, 5);
    assert_eq!(snap.phase, Phase::Steady);
    assert_eq!(snap.ticks, 200);
}

#[tokio::test]
async fn loops_refuse_to_start_before_init() {
    let (driver, engine) = driver(DriverConfig::default());
    assert!(matches!(
        driver.run_frames().await,
        Err(DriverError::NotInitialized)
    ));
    assert!(matches!(
        driver.run_benchmark().await,
        Err(DriverError::NotInitialized)
    ));
    assert_eq!(engine.count(EngineCall::Tick), 0);
}
