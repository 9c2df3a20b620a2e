//! Reaction responder
//!
//! Reels after a fixed, human-like delay whenever a good crit is shown
//! during the active phase. Bad and missed crits are deliberately left
//! alone. Each scheduled reel is independent: it captures its own epoch
//! and shares nothing with other pending reels.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::engine::{CritSignal, MinigamePhase};
use crate::error::ReelError;
use crate::observability::metrics::{self, ReelResult};
use crate::observability::Event;

use super::Core;
use super::session::Epoch;

/// How a scheduled reel ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReelOutcome {
    /// The engine accepted the reel.
    Committed,
    /// The phase or session moved on during the delay; nothing was done.
    Stale,
    /// The player was not in a fishing state.
    NotFishing,
    /// The engine raised a fault.
    Failed(String),
}

/// Handle that feeds crit notifications into the core.
#[derive(Debug, Clone)]
pub struct ReactionResponder {
    core: Arc<Core>,
}

impl ReactionResponder {
    pub(crate) const fn new(core: Arc<Core>) -> Self {
        Self { core }
    }

    /// Handles one crit notification.
    ///
    /// Returns the handle of the scheduled reel for good crits, `None`
    /// otherwise.
    pub fn on_crit(&self, signal: CritSignal) -> Option<JoinHandle<ReelOutcome>> {
        if !self.core.session.is_enabled()
            || self.core.engine.controller.game_state() != MinigamePhase::Active
        {
            debug!(%signal, "crit ignored outside an enabled active phase");
            return None;
        }

        info!(%signal, "fishing crit indicated");
        metrics::record_crit(signal);
        self.core.emit(Event::CritObserved {
            timestamp: Utc::now(),
            signal,
        });

        match signal {
            CritSignal::Good => Some(self.schedule_reel()),
            CritSignal::Bad => {
                info!("bad crit detected; avoiding input");
                None
            }
            CritSignal::Miss => {
                info!("miss crit detected; no action needed");
                None
            }
        }
    }

    fn schedule_reel(&self) -> JoinHandle<ReelOutcome> {
        let epoch = self.core.session.epoch();
        let delay = self.core.timing.reaction_delay;
        let responder = self.clone();
        self.core.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            responder.fire(epoch, delay)
        })
    }

    /// Commits a reel scheduled under `epoch` if the minigame is still active.
    fn fire(&self, epoch: Epoch, delay: Duration) -> ReelOutcome {
        if !self.core.session.is_current(epoch)
            || self.core.engine.controller.game_state() != MinigamePhase::Active
        {
            debug!(%epoch, "phase moved on; dropping stale reaction");
            metrics::record_reel(ReelResult::Stale);
            return ReelOutcome::Stale;
        }

        let angler = &self.core.engine.angler;
        let result = catch_unwind(AssertUnwindSafe(|| angler.reel()))
            .unwrap_or_else(|payload| Err(ReelError::Failed(panic_message(payload.as_ref()))));

        match result {
            Ok(()) => {
                info!("responded to good crit");
                metrics::record_reel(ReelResult::Committed);
                self.core.emit(Event::ReelCommitted {
                    timestamp: Utc::now(),
                    delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                });
                ReelOutcome::Committed
            }
            Err(ReelError::NotFishing) => {
                warn!("player is not in fishing state when trying to reel");
                metrics::record_reel(ReelResult::Skipped);
                self.emit_failure(&ReelError::NotFishing);
                ReelOutcome::NotFishing
            }
            Err(ReelError::Failed(detail)) => {
                error!(error = %detail, "failed to simulate player input");
                metrics::record_reel(ReelResult::Failed);
                self.emit_failure(&ReelError::Failed(detail.clone()));
                ReelOutcome::Failed(detail)
            }
        }
    }

    fn emit_failure(&self, err: &ReelError) {
        self.core.emit(Event::ReelFailed {
            timestamp: Utc::now(),
            reason: err.to_string(),
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "engine panicked".to_string())
}
