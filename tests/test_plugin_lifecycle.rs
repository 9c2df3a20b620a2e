mod common;

use std::sync::Arc;

use autofisher::config::{AutomationConfig, SimulationConfig};
use autofisher::host::Plugin;
use autofisher::observability::EventEmitter;
use autofisher::sim::{FishingDriver, RoundOutcome, SimulatedEngine};
use common::settle;
use tokio_util::sync::CancellationToken;

fn load(engine: &Arc<SimulatedEngine>, config: &AutomationConfig) -> Plugin {
    Plugin::load(engine.handles(), config, None).expect("inside a tokio runtime")
}

fn only_good_crits(rounds: u32) -> SimulationConfig {
    SimulationConfig {
        rounds,
        seed: Some(11),
        good_weight: 1,
        bad_weight: 0,
        miss_weight: 0,
        ..SimulationConfig::default()
    }
}

// ============================================================================
// Scenes
// ============================================================================

#[tokio::test(start_paused = true)]
async fn excluded_scenes_never_attach() {
    let engine = Arc::new(SimulatedEngine::new());
    let plugin = load(&engine, &AutomationConfig::default());

    for scene in ["Boot", "Intro", "MainMenu", "LoadingScreen"] {
        plugin.on_scene_loaded(scene);
        settle().await;
        assert_eq!(engine.hook_count(), 0, "{scene} must not attach");
    }

    plugin.on_scene_loaded("Harbor");
    settle().await;
    assert_eq!(engine.hook_count(), 2);

    plugin.on_scene_loaded("MainMenu");
    assert_eq!(engine.hook_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn custom_exclusions_replace_defaults() {
    let engine = Arc::new(SimulatedEngine::new());
    let config = AutomationConfig {
        excluded_scenes: vec!["Credits".into()],
        ..AutomationConfig::default()
    };
    let plugin = load(&engine, &config);

    plugin.on_scene_loaded("MainMenu");
    settle().await;
    assert_eq!(engine.hook_count(), 2);

    plugin.on_scene_loaded("Credits");
    assert_eq!(engine.hook_count(), 0);
}

// ============================================================================
// Enable flag and teardown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn disabling_applies_at_next_scene() {
    let engine = Arc::new(SimulatedEngine::new());
    let plugin = load(&engine, &AutomationConfig::default());
    plugin.on_scene_loaded("Harbor");
    settle().await;

    plugin.set_enabled(false);
    assert!(!plugin.is_enabled());
    assert_eq!(engine.hook_count(), 2, "still attached until the next scene");

    plugin.on_scene_loaded("Harbor");
    settle().await;
    assert_eq!(engine.hook_count(), 0);

    plugin.set_enabled(true);
    plugin.on_scene_loaded("Harbor");
    settle().await;
    assert_eq!(engine.hook_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_plugin_releases_hooks() {
    let engine = Arc::new(SimulatedEngine::new());
    let plugin = load(&engine, &AutomationConfig::default());
    plugin.on_scene_loaded("Harbor");
    settle().await;
    assert_eq!(engine.hook_count(), 2);

    drop(plugin);

    assert_eq!(engine.hook_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn explicit_shutdown_then_drop() {
    let engine = Arc::new(SimulatedEngine::new());
    let plugin = load(&engine, &AutomationConfig::default());
    plugin.on_scene_loaded("Harbor");
    settle().await;

    plugin.shutdown();
    assert_eq!(engine.hook_count(), 0);
    assert!(!plugin.automation().session().is_subscribed());

    drop(plugin);
    assert_eq!(engine.hook_count(), 0);
}

// ============================================================================
// Full rounds
// ============================================================================

#[tokio::test(start_paused = true)]
async fn automation_wins_rounds_of_good_crits() {
    let engine = Arc::new(SimulatedEngine::new());
    let plugin = load(&engine, &AutomationConfig::default());
    plugin.on_scene_loaded("Harbor");
    settle().await;

    let mut driver = FishingDriver::new(Arc::clone(&engine), only_good_crits(3));
    let report = driver.run(&CancellationToken::new()).await;

    assert_eq!(report.rounds.len(), 3);
    assert_eq!(report.count(RoundOutcome::Won), 3);
    assert!(report.rounds.iter().all(|r| r.stray_reels == 0));
    assert_eq!(engine.hooked_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn unattended_rounds_escape() {
    let engine = Arc::new(SimulatedEngine::new());
    let config = AutomationConfig {
        enabled: false,
        ..AutomationConfig::default()
    };
    let plugin = load(&engine, &config);
    plugin.on_scene_loaded("Harbor");
    settle().await;

    let mut driver = FishingDriver::new(Arc::clone(&engine), only_good_crits(2));
    let report = driver.run(&CancellationToken::new()).await;

    assert_eq!(report.count(RoundOutcome::Escaped), 2);
    assert_eq!(engine.reel_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn bad_crits_are_never_answered() {
    let engine = Arc::new(SimulatedEngine::new());
    let plugin = load(&engine, &AutomationConfig::default());
    plugin.on_scene_loaded("Harbor");
    settle().await;

    let config = SimulationConfig {
        good_weight: 0,
        bad_weight: 1,
        miss_weight: 1,
        ..only_good_crits(1)
    };
    let mut driver = FishingDriver::new(Arc::clone(&engine), config);
    let report = driver.run(&CancellationToken::new()).await;

    assert_eq!(report.count(RoundOutcome::Lost), 1);
    assert_eq!(engine.reel_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn events_are_written_as_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let events = Arc::new(EventEmitter::from_file(&path).unwrap());

    let engine = Arc::new(SimulatedEngine::new());
    let plugin = Plugin::load(
        engine.handles(),
        &AutomationConfig::default(),
        Some(Arc::clone(&events)),
    )
    .unwrap();
    plugin.on_scene_loaded("Harbor");
    settle().await;

    let mut driver = FishingDriver::new(Arc::clone(&engine), only_good_crits(1));
    driver.run(&CancellationToken::new()).await;
    plugin.shutdown();

    let contents = std::fs::read_to_string(&path).unwrap();
    let types: Vec<String> = contents
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["type"].as_str().unwrap().to_string()
        })
        .collect();

    assert_eq!(types.first().map(String::as_str), Some("SessionSubscribed"));
    assert_eq!(types.last().map(String::as_str), Some("SessionReleased"));
    for expected in ["BiteHooked", "CritObserved", "ReelCommitted", "RoundFinished"] {
        assert!(
            types.iter().any(|t| t == expected),
            "missing {expected} in {types:?}"
        );
    }
}
