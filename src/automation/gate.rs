//! Session gate
//!
//! Owns the controller hook registration across scene boundaries. Each
//! boundary releases the current registration, starts a new session epoch
//! and, when the new context is eligible, waits for the controller before
//! registering again. The registration slot's mutex serializes every
//! subscribe/unsubscribe, so at most one registration exists at any time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::engine::{CritSignal, MinigamePhase};
use crate::observability::{Event, metrics};

use super::Core;
use super::responder::ReactionResponder;
use super::subscription::Subscription;
use super::tracker::PhaseTracker;

/// Owner of the subscribe/unsubscribe lifecycle.
#[derive(Debug)]
pub struct SessionGate {
    core: Arc<Core>,
    slot: Mutex<Option<Subscription>>,
}

impl SessionGate {
    pub(crate) const fn new(core: Arc<Core>) -> Self {
        Self {
            core,
            slot: Mutex::new(None),
        }
    }

    /// Handles a scene/session change.
    ///
    /// Always unsubscribes first and clears the bite watch. When the new
    /// context is eligible and automation is enabled, spawns a wait for the
    /// controller that subscribes once it appears.
    pub fn on_session_boundary(self: &Arc<Self>, is_valid_context: bool) {
        let session_epoch = {
            let mut slot = self.lock_slot();
            self.release_locked(&mut slot);
            self.core.session.advance_session()
        };

        if !is_valid_context {
            debug!(session_epoch, "context not eligible for automation");
            return;
        }

        if !self.core.session.is_enabled() {
            info!(session_epoch, "automation disabled; staying detached");
            return;
        }

        let gate = Arc::clone(self);
        self.core
            .runtime
            .spawn(async move { gate.wait_for_controller(session_epoch).await });
    }

    /// Releases the registration and voids every pending task.
    pub fn shutdown(&self) {
        let mut slot = self.lock_slot();
        self.release_locked(&mut slot);
        let session_epoch = self.core.session.advance_session();
        debug!(session_epoch, "session gate shut down");
    }

    /// Whether hooks are currently registered.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.lock_slot().is_some()
    }

    /// Polls for the controller until it exists, then subscribes.
    ///
    /// Gives up silently once a newer boundary has started another session.
    async fn wait_for_controller(&self, session_epoch: u64) {
        let controller = &self.core.engine.controller;
        let mut warned = false;

        loop {
            if !self.core.session.is_current_session(session_epoch) {
                debug!(session_epoch, "controller wait superseded by a newer session");
                return;
            }
            if controller.is_available() {
                break;
            }
            if !warned {
                warn!(session_epoch, "fishing controller not available yet; waiting");
                warned = true;
            }
            tokio::time::sleep(self.core.timing.controller_poll_interval).await;
        }

        self.subscribe(session_epoch);
    }

    /// Registers both hooks unless the session moved on or is already subscribed.
    fn subscribe(&self, session_epoch: u64) {
        let mut slot = self.lock_slot();

        if !self.core.session.is_current_session(session_epoch) {
            debug!(session_epoch, "session ended before subscribing");
            return;
        }
        if slot.is_some() {
            debug!(session_epoch, "already subscribed");
            return;
        }

        info!(session_epoch, "fishing controller found; subscribing to events");

        let weak = Arc::downgrade(&self.core);
        let state_hook = {
            let weak = Weak::clone(&weak);
            Arc::new(move |phase: MinigamePhase| {
                if let Some(core) = live_core(&weak, session_epoch) {
                    PhaseTracker::new(core).on_phase_change(phase);
                }
            })
        };
        let crit_hook = Arc::new(move |signal: CritSignal| {
            if let Some(core) = live_core(&weak, session_epoch) {
                ReactionResponder::new(core).on_crit(signal);
            }
        });

        *slot = Some(Subscription::register(
            Arc::clone(&self.core.engine.controller),
            state_hook,
            crit_hook,
        ));
        self.core.session.set_subscribed(true);

        metrics::record_subscribed();
        self.core.emit(Event::SessionSubscribed {
            timestamp: Utc::now(),
            epoch: session_epoch,
        });
    }

    fn release_locked(&self, slot: &mut Option<Subscription>) {
        if let Some(mut subscription) = slot.take() {
            subscription.release();
            info!("unsubscribed from fishing controller events");
            metrics::record_unsubscribed();
            self.core.emit(Event::SessionReleased {
                timestamp: Utc::now(),
                epoch: self.core.session.epoch().session,
            });
        }
        self.core.session.set_subscribed(false);
        self.core.session.clear_waiting();
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Subscription>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Upgrades a hook's core reference if it still belongs to the live session.
fn live_core(weak: &Weak<Core>, session_epoch: u64) -> Option<Arc<Core>> {
    let core = weak.upgrade()?;
    if core.session.is_current_session(session_epoch) {
        Some(core)
    } else {
        debug!(session_epoch, "dropping notification for a released session");
        None
    }
}
