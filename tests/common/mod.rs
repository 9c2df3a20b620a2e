//! Shared integration-test harness: a [`SimulatedEngine`] wired to an
//! [`Automation`] core, plus helpers for running the `autofisher` binary.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;
use std::time::Duration;

use autofisher::automation::{Automation, EnabledFlag, Timing};
use autofisher::observability::EventEmitter;
use autofisher::sim::SimulatedEngine;

/// Default reaction delay.
pub const REACTION: Duration = Duration::from_millis(100);

/// Default line poll interval.
pub const BITE_POLL: Duration = Duration::from_millis(50);

/// An automation core attached to a simulated engine.
pub struct Harness {
    pub engine: Arc<SimulatedEngine>,
    pub automation: Automation,
    pub events: Arc<EventEmitter>,
}

impl Harness {
    /// Builds an enabled core with default timing. Must run inside a runtime.
    pub fn new() -> Self {
        Self::with_enabled(true)
    }

    /// Builds a core with the given enable flag.
    pub fn with_enabled(enabled: bool) -> Self {
        let engine = Arc::new(SimulatedEngine::new());
        let events = Arc::new(EventEmitter::noop());
        let automation = Automation::new(
            engine.handles(),
            Timing::default(),
            EnabledFlag::new(enabled),
            Some(Arc::clone(&events)),
        )
        .expect("inside a tokio runtime");
        Self {
            engine,
            automation,
            events,
        }
    }

    /// Builds a core and waits until its hooks are registered.
    pub async fn subscribed() -> Self {
        let harness = Self::new();
        harness.automation.on_session_boundary(true);
        settle().await;
        assert!(
            harness.automation.gate().is_subscribed(),
            "controller is available, hooks should attach immediately"
        );
        harness
    }
}

/// Lets every ready task run without advancing the clock.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Runs the `autofisher` binary with the given arguments and waits for it.
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_autofisher"))
        .args(args)
        .env_remove("AUTOFISHER_CONFIG")
        .env_remove("AUTOFISHER_METRICS_PORT")
        .env_remove("AUTOFISHER_ENABLED")
        .env_remove("AUTOFISHER_REACTION_DELAY")
        .env_remove("AUTOFISHER_BITE_POLL_INTERVAL")
        .env_remove("AUTOFISHER_CONTROLLER_POLL_INTERVAL")
        .output()
        .expect("failed to spawn autofisher")
}

/// Writes a YAML config into `dir` and returns its path as a string.
pub fn write_config(dir: &Path, name: &str, yaml: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, yaml).expect("write config");
    path.to_str().expect("non-UTF-8 temp path").to_string()
}
