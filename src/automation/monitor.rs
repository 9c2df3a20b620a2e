//! Bite monitor
//!
//! The biting condition is only exposed as pollable line state, so the
//! monitor reads it on a fixed cadence while the session waits for a bite.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::MinigamePhase;
use crate::observability::{Event, metrics};

use super::Core;
use super::session::Epoch;

/// How a bite watch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiteWatchOutcome {
    /// A bite was seen and the hooked flag raised.
    Hooked {
        /// Line reads including the one that saw the bite.
        reads: u64,
    },
    /// The watch was disarmed, the phase left pregame, or the epoch moved on.
    Cancelled {
        /// Line reads performed before stopping.
        reads: u64,
    },
}

/// Single-shot line watcher.
#[derive(Debug, Clone)]
pub struct BiteMonitor {
    core: Arc<Core>,
}

impl BiteMonitor {
    pub(crate) const fn new(core: Arc<Core>) -> Self {
        Self { core }
    }

    /// Spawns [`run_bite_watch`](Self::run_bite_watch) on the core's runtime.
    pub fn spawn(self, epoch: Epoch) -> JoinHandle<BiteWatchOutcome> {
        let runtime = self.core.runtime.clone();
        runtime.spawn(async move { self.run_bite_watch(epoch).await })
    }

    /// Polls the line until a bite, or until the watch is no longer wanted.
    ///
    /// Continues only while automation is enabled, the session is waiting
    /// for a bite, the engine reports pregame, and `epoch` is current. The
    /// first biting read raises the hooked flag and ends the watch; it never
    /// re-arms itself. A watch that stops under a current epoch disarms the
    /// session on its way out.
    pub async fn run_bite_watch(&self, epoch: Epoch) -> BiteWatchOutcome {
        let controller = &self.core.engine.controller;
        let mut reads = 0u64;

        loop {
            if !self.should_continue(epoch) {
                if self.core.session.is_current(epoch) {
                    self.core.session.clear_waiting();
                }
                debug!(%epoch, reads, "bite watch ended without a bite");
                return BiteWatchOutcome::Cancelled { reads };
            }

            reads += 1;
            if controller.is_biting() {
                controller.set_hooked();
                self.core.session.clear_waiting();

                info!(%epoch, reads, "fish is biting; hooked");
                metrics::record_bite();
                self.core.emit(Event::BiteHooked {
                    timestamp: Utc::now(),
                    reads,
                });
                return BiteWatchOutcome::Hooked { reads };
            }

            tokio::time::sleep(self.core.timing.bite_poll_interval).await;
        }
    }

    fn should_continue(&self, epoch: Epoch) -> bool {
        let session = &self.core.session;
        session.is_enabled()
            && session.is_waiting_for_bite()
            && session.is_current(epoch)
            && self.core.engine.controller.game_state() == MinigamePhase::Pregame
    }
}
