//! `run` command
//!
//! Loads the plugin into a simulated host, plays the configured rounds and
//! prints a summary.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::{AutofisherConfig, ConfigLoader};
use crate::error::{AutofisherError, AutomationError};
use crate::host::Plugin;
use crate::observability::EventEmitter;
use crate::sim::{FishingDriver, RoundOutcome, RoundReport, SimulatedEngine, SimulationReport};

/// Scene loaded before gameplay; always excluded by the default filter.
const BOOT_SCENE: &str = "Boot";

/// Scene the simulated host settles in.
const GAMEPLAY_SCENE: &str = "Harbor";

/// Grace period on top of the controller delay for the hooks to attach.
const SUBSCRIBE_GRACE: Duration = Duration::from_secs(2);

/// Poll cadence while waiting for the hooks to attach.
const SUBSCRIBE_POLL: Duration = Duration::from_millis(10);

/// Summary printed after a run.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    seed: u64,
    enabled: bool,
    won: usize,
    lost: usize,
    escaped: usize,
    reels: u64,
    hooked: u64,
    rounds: &'a [RoundReport],
}

/// Runs the automation against the simulated engine.
///
/// # Errors
///
/// Returns an error if configuration loading fails, the events file or
/// metrics listener cannot be opened, or the hooks never attach.
pub async fn run(args: &RunArgs, cancel: CancellationToken) -> Result<(), AutofisherError> {
    if let Some(path) = &args.config {
        tracing::info!(config = %path.display(), "loading configuration");
    }
    let loaded = ConfigLoader::new().load(args.config.as_deref())?;
    for warning in &loaded.warnings {
        tracing::warn!(%warning, "configuration warning");
    }
    let config = apply_overrides(&loaded.config, args);

    if let Some(port) = args.metrics_port {
        crate::observability::init_metrics(Some(port))?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    let events = match &args.events {
        Some(path) => Some(Arc::new(EventEmitter::from_file(path)?)),
        None => None,
    };

    let engine = Arc::new(SimulatedEngine::new());
    engine.set_available(false);

    let plugin = Plugin::load(engine.handles(), &config.automation, events.clone())?;
    plugin.on_scene_loaded(BOOT_SCENE);
    plugin.on_scene_loaded(GAMEPLAY_SCENE);

    let controller_delay = config.simulation.controller_delay;
    let spawner = Arc::clone(&engine);
    tokio::spawn(async move {
        tokio::time::sleep(controller_delay).await;
        spawner.set_available(true);
        tracing::debug!("fishing controller available");
    });

    if plugin.is_enabled() {
        wait_for_subscription(&plugin, controller_delay + SUBSCRIBE_GRACE, &cancel).await?;
    } else {
        tracing::warn!("automation disabled; rounds will play unattended");
    }

    let mut driver = FishingDriver::new(Arc::clone(&engine), config.simulation.clone());
    tracing::info!(
        seed = driver.seed(),
        rounds = config.simulation.rounds,
        "starting simulation"
    );
    let report = driver.run(&cancel).await;

    plugin.shutdown();

    print_summary(&report, &engine, plugin.is_enabled(), args.format)?;

    if let Some(events) = events {
        tracing::debug!(events = events.event_count(), "events written");
    }

    if cancel.is_cancelled() {
        return Err(AutofisherError::Automation(AutomationError::Interrupted));
    }
    Ok(())
}

fn apply_overrides(config: &AutofisherConfig, args: &RunArgs) -> AutofisherConfig {
    let mut config = config.clone();
    if let Some(rounds) = args.rounds {
        config.simulation.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if args.disabled {
        config.automation.enabled = false;
    }
    config
}

async fn wait_for_subscription(
    plugin: &Plugin,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<(), AutomationError> {
    let deadline = Instant::now() + timeout;
    while !plugin.automation().gate().is_subscribed() {
        if cancel.is_cancelled() {
            return Err(AutomationError::Interrupted);
        }
        if Instant::now() >= deadline {
            return Err(AutomationError::SubscribeTimeout(timeout));
        }
        tokio::time::sleep(SUBSCRIBE_POLL).await;
    }
    Ok(())
}

fn print_summary(
    report: &SimulationReport,
    engine: &SimulatedEngine,
    enabled: bool,
    format: OutputFormat,
) -> Result<(), AutofisherError> {
    let summary = RunSummary {
        seed: report.seed,
        enabled,
        won: report.count(RoundOutcome::Won),
        lost: report.count(RoundOutcome::Lost),
        escaped: report.count(RoundOutcome::Escaped),
        reels: engine.reel_count(),
        hooked: engine.hooked_count(),
        rounds: &report.rounds,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} rounds (seed {}): {} won, {} lost, {} escaped",
                summary.rounds.len(),
                summary.seed,
                summary.won,
                summary.lost,
                summary.escaped
            );
            println!("  bites hooked: {}", summary.hooked);
            println!("  reels:        {}", summary.reels);
            for round in summary.rounds {
                println!(
                    "  #{:<3} {:?}: {} crits, {} good reels, {} stray",
                    round.round, round.outcome, round.crits, round.good_reels, round.stray_reels
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
