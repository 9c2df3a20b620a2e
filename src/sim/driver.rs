//! Scripted fishing rounds against the [`SimulatedEngine`].
//!
//! Plays the engine's side of the minigame: cast, bite after a random
//! delay, crit windows drawn from configured weights, and a verdict based on
//! how many good crits were answered by a reel in time.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::engine::{CritSignal, FishingController, MinigamePhase};

use super::engine::SimulatedEngine;

/// Time the fish stays on the line after biting before it gives up.
const BITE_PATIENCE: Duration = Duration::from_secs(1);

/// Pause between the engine's own phase steps.
const STEP: Duration = Duration::from_millis(50);

/// Cadence at which the driver checks whether the fish was hooked.
const HOOK_CHECK: Duration = Duration::from_millis(10);

/// Result of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    /// Fish landed.
    Won,
    /// Fish escaped during the active phase.
    Lost,
    /// Nobody hooked the bite; round canceled.
    Escaped,
}

/// Per-round statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    /// One-based round number.
    pub round: u32,
    /// How the round ended.
    pub outcome: RoundOutcome,
    /// Crit windows shown.
    pub crits: u32,
    /// Good crits answered in time.
    pub good_reels: u32,
    /// Reels that landed outside a good window.
    pub stray_reels: u32,
}

/// Aggregate result of a simulation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationReport {
    /// Seed the RNG was built from.
    pub seed: u64,
    /// Every finished round.
    pub rounds: Vec<RoundReport>,
}

impl SimulationReport {
    /// Rounds with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: RoundOutcome) -> usize {
        self.rounds.iter().filter(|r| r.outcome == outcome).count()
    }
}

/// Drives full fishing rounds.
#[derive(Debug)]
pub struct FishingDriver {
    engine: Arc<SimulatedEngine>,
    config: SimulationConfig,
    rng: StdRng,
    seed: u64,
}

impl FishingDriver {
    /// Creates a driver; a missing seed is drawn from the OS.
    #[must_use]
    pub fn new(engine: Arc<SimulatedEngine>, config: SimulationConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        engine.set_hook_advances(true);
        Self {
            engine,
            config,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed in use.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Plays the configured number of rounds, stopping early on cancellation.
    pub async fn run(&mut self, cancel: &CancellationToken) -> SimulationReport {
        let mut report = SimulationReport {
            seed: self.seed,
            rounds: Vec::new(),
        };

        for round in 1..=self.config.rounds {
            let played = tokio::select! {
                () = cancel.cancelled() => None,
                r = self.play_round(round) => Some(r),
            };
            let Some(result) = played else {
                info!(round, "simulation cancelled");
                self.engine.set_phase(MinigamePhase::Inactive);
                break;
            };
            report.rounds.push(result);
        }

        report
    }

    /// Plays a single round.
    pub async fn play_round(&mut self, round: u32) -> RoundReport {
        let engine = Arc::clone(&self.engine);
        let mut report = RoundReport {
            round,
            outcome: RoundOutcome::Escaped,
            crits: 0,
            good_reels: 0,
            stray_reels: 0,
        };

        engine.set_biting(false);
        engine.set_phase(MinigamePhase::Setup);
        tokio::time::sleep(STEP).await;
        engine.set_phase(MinigamePhase::Pregame);

        let bite_after = self.bite_delay();
        debug!(round, ?bite_after, "fish approaching");
        tokio::time::sleep(bite_after).await;
        engine.set_biting(true);

        let hooked = self.wait_for_hook().await;
        engine.set_biting(false);
        if !hooked {
            info!(round, "fish escaped before being hooked");
            engine.set_phase(MinigamePhase::Canceled);
            tokio::time::sleep(STEP).await;
            engine.set_phase(MinigamePhase::Inactive);
            return report;
        }

        while report.crits < self.config.max_crits && report.good_reels < self.config.reels_to_win
        {
            tokio::time::sleep(self.config.crit_spacing).await;
            let signal = self.draw_crit();

            engine.take_reels();
            let shown = Instant::now();
            engine.emit_crit(signal);
            tokio::time::sleep(self.config.crit_window).await;

            let in_window = engine
                .take_reels()
                .into_iter()
                .filter(|at| at.duration_since(shown) <= self.config.crit_window)
                .count();
            report.crits += 1;

            if signal == CritSignal::Good && in_window > 0 {
                report.good_reels += 1;
            } else {
                report.stray_reels += u32::try_from(in_window).unwrap_or(u32::MAX);
            }
        }

        let outcome = if report.good_reels >= self.config.reels_to_win {
            report.outcome = RoundOutcome::Won;
            MinigamePhase::Win
        } else {
            report.outcome = RoundOutcome::Lost;
            MinigamePhase::Lose
        };
        info!(round, %outcome, crits = report.crits, good_reels = report.good_reels, "round finished");

        engine.set_phase(outcome);
        tokio::time::sleep(STEP).await;
        engine.set_phase(MinigamePhase::Inactive);
        report
    }

    async fn wait_for_hook(&self) -> bool {
        let deadline = Instant::now() + BITE_PATIENCE;
        while Instant::now() < deadline {
            if self.engine.game_state() == MinigamePhase::Active {
                return true;
            }
            tokio::time::sleep(HOOK_CHECK).await;
        }
        self.engine.game_state() == MinigamePhase::Active
    }

    fn bite_delay(&mut self) -> Duration {
        let min = duration_ms(self.config.bite_delay_min);
        let max = duration_ms(self.config.bite_delay_max).max(min);
        Duration::from_millis(self.rng.random_range(min..=max))
    }

    fn draw_crit(&mut self) -> CritSignal {
        let good = u64::from(self.config.good_weight);
        let bad = u64::from(self.config.bad_weight);
        let total = self.config.total_crit_weight();
        if total == 0 {
            return CritSignal::Miss;
        }

        let roll = self.rng.random_range(0..total);
        if roll < good {
            CritSignal::Good
        } else if roll < good + bad {
            CritSignal::Bad
        } else {
            CritSignal::Miss
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
