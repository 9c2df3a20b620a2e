//! Automation session state
//!
//! Lock-free atomic state shared by the gate, the tracker, the bite monitor
//! and the responder. Every delayed or looping task captures an [`Epoch`]
//! when it is spawned and checks it again before acting; a task whose epoch
//! is no longer current is void.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};

use crate::engine::MinigamePhase;

/// Host-owned enable flag, read before every reactive decision.
///
/// Clones share the same flag.
#[derive(Debug, Clone)]
pub struct EnabledFlag(Arc<AtomicBool>);

impl EnabledFlag {
    /// Creates a flag with the given initial value.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Replaces the value.
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::SeqCst);
    }
}

impl Default for EnabledFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Snapshot of the session and phase counters a task was spawned under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    /// Advanced on every session boundary and on shutdown.
    pub session: u64,
    /// Advanced on every observed phase transition.
    pub phase: u64,
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.session, self.phase)
    }
}

/// Shared automation session state.
///
/// `subscribed` mirrors the gate's registration slot and is only written
/// while that slot's lock is held.
pub struct AutomationSession {
    enabled: EnabledFlag,
    subscribed: AtomicBool,
    waiting_for_bite: AtomicBool,
    session_epoch: AtomicU64,
    phase_epoch: AtomicU64,
    /// Last phase seen in a notification; `0` when unknown.
    last_phase: AtomicU8,
}

impl AutomationSession {
    /// Creates an unsubscribed, idle session.
    #[must_use]
    pub fn new(enabled: EnabledFlag) -> Self {
        Self {
            enabled,
            subscribed: AtomicBool::new(false),
            waiting_for_bite: AtomicBool::new(false),
            session_epoch: AtomicU64::new(0),
            phase_epoch: AtomicU64::new(0),
            last_phase: AtomicU8::new(0),
        }
    }

    /// Whether automation is currently enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// The shared enable flag.
    #[must_use]
    pub const fn enabled_flag(&self) -> &EnabledFlag {
        &self.enabled
    }

    /// Whether controller hooks are currently registered.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    pub(crate) fn set_subscribed(&self, subscribed: bool) {
        self.subscribed.store(subscribed, Ordering::SeqCst);
    }

    /// Whether a bite watch is armed.
    #[must_use]
    pub fn is_waiting_for_bite(&self) -> bool {
        self.waiting_for_bite.load(Ordering::SeqCst)
    }

    /// Arms the bite watch. Returns `false` if it was already armed.
    pub(crate) fn try_begin_waiting(&self) -> bool {
        self.waiting_for_bite
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn clear_waiting(&self) {
        self.waiting_for_bite.store(false, Ordering::SeqCst);
    }

    /// Current epoch.
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        Epoch {
            session: self.session_epoch.load(Ordering::SeqCst),
            phase: self.phase_epoch.load(Ordering::SeqCst),
        }
    }

    /// Whether a task spawned under `epoch` may still act.
    #[must_use]
    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.epoch() == epoch
    }

    /// Whether hooks registered under `session` still belong to this session.
    #[must_use]
    pub fn is_current_session(&self, session: u64) -> bool {
        self.session_epoch.load(Ordering::SeqCst) == session
    }

    /// Starts a new session epoch and forgets the observed phase.
    ///
    /// Returns the new session epoch.
    pub(crate) fn advance_session(&self) -> u64 {
        self.last_phase.store(0, Ordering::SeqCst);
        self.session_epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Records a phase notification.
    ///
    /// Returns `true` when it differs from the previous notification, in
    /// which case the phase epoch is advanced.
    pub(crate) fn observe_phase(&self, phase: MinigamePhase) -> bool {
        let previous = self.last_phase.swap(phase.as_u8(), Ordering::SeqCst);
        let changed = previous != phase.as_u8();
        if changed {
            self.phase_epoch.fetch_add(1, Ordering::SeqCst);
        }
        changed
    }

    /// Phase of the most recent notification, if any since subscribing.
    #[must_use]
    pub fn last_phase(&self) -> Option<MinigamePhase> {
        MinigamePhase::from_u8(self.last_phase.load(Ordering::SeqCst))
    }
}

impl std::fmt::Debug for AutomationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomationSession")
            .field("enabled", &self.is_enabled())
            .field("subscribed", &self.is_subscribed())
            .field("waiting_for_bite", &self.is_waiting_for_bite())
            .field("epoch", &self.epoch())
            .finish_non_exhaustive()
    }
}
