//! Phase tracker
//!
//! Reacts to the controller's phase notifications. The engine is
//! authoritative; the tracker only arms and disarms the bite watch.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::engine::MinigamePhase;
use crate::observability::{Event, metrics};

use super::Core;
use super::monitor::BiteMonitor;

/// Handle that feeds phase notifications into the core.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    core: Arc<Core>,
}

impl PhaseTracker {
    pub(crate) const fn new(core: Arc<Core>) -> Self {
        Self { core }
    }

    /// Handles one phase notification.
    ///
    /// Entering pregame arms the bite watch unless it is already armed or
    /// the notification repeats the previous phase. Leaving pregame
    /// disarms it. While automation is disabled only the phase bookkeeping
    /// runs, so a later pregame is still seen as a fresh entry.
    pub fn on_phase_change(&self, phase: MinigamePhase) {
        let session = &self.core.session;
        let transition = session.observe_phase(phase);
        if phase != MinigamePhase::Pregame {
            session.clear_waiting();
        }

        if !session.is_enabled() {
            debug!(%phase, "automation disabled; ignoring phase change");
            return;
        }
        info!(%phase, transition, "fishing state changed");

        match phase {
            MinigamePhase::Setup => info!("fishing minigame setup detected"),
            MinigamePhase::Pregame => self.enter_pregame(transition),
            MinigamePhase::Active => info!("fishing minigame active; automation ready"),
            MinigamePhase::Win => info!("fishing minigame won"),
            MinigamePhase::Lose => {
                warn!("fishing minigame lost; this should not happen with automation");
            }
            MinigamePhase::Canceled => info!("fishing minigame was canceled"),
            MinigamePhase::Inactive => info!("fishing minigame ended"),
        }

        if phase.is_outcome() {
            metrics::record_outcome(phase);
            self.core.emit(Event::RoundFinished {
                timestamp: Utc::now(),
                outcome: phase,
            });
        }
    }

    fn enter_pregame(&self, transition: bool) {
        let session = &self.core.session;
        if !transition {
            debug!("repeated pregame notification ignored");
            return;
        }
        if !session.try_begin_waiting() {
            debug!("already waiting for a bite");
            return;
        }

        let epoch = session.epoch();
        info!(%epoch, "pregame: watching the line for a bite");
        BiteMonitor::new(Arc::clone(&self.core)).spawn(epoch);
    }
}
