//! In-process fishing engine.
//!
//! Implements [`FishingController`] and [`Angler`] with fully scriptable
//! state: controller availability, phase, line readings, reel faults. Hooks
//! are invoked synchronously on the caller's thread, outside every internal
//! lock, so a hook may call straight back into the engine.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::trace;

use crate::engine::{
    Angler, CritHook, CritSignal, EngineHandles, FishingController, HookId, MinigamePhase,
    StateHook,
};
use crate::error::ReelError;

/// Fault injected into the next reels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReelFault {
    /// Reels report that the player is not fishing.
    NotFishing,
    /// Reels return an engine error with this detail.
    Error(String),
    /// Reels panic with this message.
    Panic(String),
}

#[derive(Debug)]
struct SimState {
    phase: MinigamePhase,
    biting: bool,
    line_script: VecDeque<bool>,
    reel_fault: Option<ReelFault>,
    reel_log: Vec<Instant>,
}

/// Scriptable fishing engine.
pub struct SimulatedEngine {
    state: Mutex<SimState>,
    available: AtomicBool,
    hook_advances: AtomicBool,
    state_hooks: DashMap<HookId, StateHook>,
    crit_hooks: DashMap<HookId, CritHook>,
    next_hook: AtomicU64,
    line_reads: AtomicU64,
    hooked_count: AtomicU64,
    reel_count: AtomicU64,
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedEngine {
    /// Creates an available controller with no minigame running.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                phase: MinigamePhase::Inactive,
                biting: false,
                line_script: VecDeque::new(),
                reel_fault: None,
                reel_log: Vec::new(),
            }),
            available: AtomicBool::new(true),
            hook_advances: AtomicBool::new(false),
            state_hooks: DashMap::new(),
            crit_hooks: DashMap::new(),
            next_hook: AtomicU64::new(1),
            line_reads: AtomicU64::new(0),
            hooked_count: AtomicU64::new(0),
            reel_count: AtomicU64::new(0),
        }
    }

    /// Injectable handles backed by this engine.
    #[must_use]
    pub fn handles(self: &Arc<Self>) -> EngineHandles {
        EngineHandles::new(
            Arc::clone(self) as Arc<dyn FishingController>,
            Arc::clone(self) as Arc<dyn Angler>,
        )
    }

    /// Makes the controller appear or disappear.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// When enabled, raising the hooked flag moves the minigame to active.
    pub fn set_hook_advances(&self, advances: bool) {
        self.hook_advances.store(advances, Ordering::SeqCst);
    }

    /// Changes the phase and notifies every state hook.
    pub fn set_phase(&self, phase: MinigamePhase) {
        self.lock().phase = phase;
        trace!(%phase, "sim phase changed");

        let hooks: Vec<StateHook> = self
            .state_hooks
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for hook in hooks {
            hook(phase);
        }
    }

    /// Changes the phase without notifying anyone.
    pub fn force_phase(&self, phase: MinigamePhase) {
        self.lock().phase = phase;
    }

    /// Shows a crit window to every crit hook.
    pub fn emit_crit(&self, signal: CritSignal) {
        let hooks: Vec<CritHook> = self
            .crit_hooks
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for hook in hooks {
            hook(signal);
        }
    }

    /// Sets the line state returned once any scripted readings are used up.
    pub fn set_biting(&self, biting: bool) {
        self.lock().biting = biting;
    }

    /// Queues line readings returned, one per read, before the steady state.
    pub fn script_line(&self, readings: impl IntoIterator<Item = bool>) {
        self.lock().line_script.extend(readings);
    }

    /// Makes subsequent reels fail; `None` restores normal reels.
    pub fn set_reel_fault(&self, fault: Option<ReelFault>) {
        self.lock().reel_fault = fault;
    }

    /// Drains the timestamps of successful reels.
    pub fn take_reels(&self) -> Vec<Instant> {
        std::mem::take(&mut self.lock().reel_log)
    }

    /// Number of line reads so far.
    #[must_use]
    pub fn line_reads(&self) -> u64 {
        self.line_reads.load(Ordering::SeqCst)
    }

    /// Number of times the hooked flag was raised.
    #[must_use]
    pub fn hooked_count(&self) -> u64 {
        self.hooked_count.load(Ordering::SeqCst)
    }

    /// Number of successful reels.
    #[must_use]
    pub fn reel_count(&self) -> u64 {
        self.reel_count.load(Ordering::SeqCst)
    }

    /// Number of registered hooks of both kinds.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.state_hooks.len() + self.crit_hooks.len()
    }

    fn next_id(&self) -> HookId {
        HookId(self.next_hook.fetch_add(1, Ordering::SeqCst))
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FishingController for SimulatedEngine {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn game_state(&self) -> MinigamePhase {
        self.lock().phase
    }

    fn is_biting(&self) -> bool {
        self.line_reads.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        let steady = state.biting;
        state.line_script.pop_front().unwrap_or(steady)
    }

    fn set_hooked(&self) {
        self.hooked_count.fetch_add(1, Ordering::SeqCst);
        if self.hook_advances.load(Ordering::SeqCst) {
            self.set_phase(MinigamePhase::Active);
        }
    }

    fn add_state_hook(&self, hook: StateHook) -> HookId {
        let id = self.next_id();
        self.state_hooks.insert(id, hook);
        id
    }

    fn add_crit_hook(&self, hook: CritHook) -> HookId {
        let id = self.next_id();
        self.crit_hooks.insert(id, hook);
        id
    }

    fn remove_hook(&self, id: HookId) -> bool {
        self.state_hooks.remove(&id).is_some() || self.crit_hooks.remove(&id).is_some()
    }
}

impl Angler for SimulatedEngine {
    fn reel(&self) -> Result<(), ReelError> {
        let fault = self.lock().reel_fault.clone();
        match fault {
            Some(ReelFault::NotFishing) => return Err(ReelError::NotFishing),
            Some(ReelFault::Error(detail)) => return Err(ReelError::Failed(detail)),
            Some(ReelFault::Panic(message)) => panic!("{message}"),
            None => {}
        }

        let mut state = self.lock();
        if !matches!(
            state.phase,
            MinigamePhase::Setup | MinigamePhase::Pregame | MinigamePhase::Active
        ) {
            return Err(ReelError::NotFishing);
        }
        state.reel_log.push(Instant::now());
        drop(state);

        self.reel_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl std::fmt::Debug for SimulatedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedEngine")
            .field("available", &self.is_available())
            .field("phase", &self.game_state())
            .field("hooks", &self.hook_count())
            .finish_non_exhaustive()
    }
}
