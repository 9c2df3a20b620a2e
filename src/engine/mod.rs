//! Contracts the automation core consumes from the fishing engine.
//!
//! The game owns the controller, the rod line and the player. Automation
//! never reaches them through globals; a host passes an [`EngineHandles`]
//! registry in at construction, which keeps the core testable against the
//! in-process simulation in [`crate::sim`].
//!
//! # Hooks
//!
//! The controller exposes two notification streams (phase changes and crit
//! windows). A listener registers a callback with
//! [`FishingController::add_state_hook`] or
//! [`FishingController::add_crit_hook`] and gets back a [`HookId`] that must
//! be handed to [`FishingController::remove_hook`] exactly once.

pub mod types;

use std::sync::Arc;

use crate::error::ReelError;

pub use types::{CritSignal, MinigamePhase};

/// Callback invoked with every phase the controller reports.
pub type StateHook = Arc<dyn Fn(MinigamePhase) + Send + Sync>;

/// Callback invoked with every crit window the controller shows.
pub type CritHook = Arc<dyn Fn(CritSignal) + Send + Sync>;

/// Opaque id of a registered hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub u64);

impl std::fmt::Display for HookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hook#{}", self.0)
    }
}

/// The fishing minigame controller.
///
/// Availability is transient: the controller is absent while a scene is
/// loading and appears at some later tick. Every other method may be called
/// while absent and must not panic; hooks added while absent are still
/// honoured by the simulated engine but real hosts should wait.
pub trait FishingController: Send + Sync {
    /// Whether the controller instance currently exists.
    fn is_available(&self) -> bool;

    /// Phase the minigame is currently in.
    fn game_state(&self) -> MinigamePhase;

    /// Pollable rod line state; `true` while a fish is biting.
    fn is_biting(&self) -> bool;

    /// Raises the hooked flag, which moves the minigame out of pregame.
    fn set_hooked(&self);

    /// Registers a phase-change callback.
    fn add_state_hook(&self, hook: StateHook) -> HookId;

    /// Registers a crit-window callback.
    fn add_crit_hook(&self, hook: CritHook) -> HookId;

    /// Removes a hook. Returns `false` if the id was not registered.
    fn remove_hook(&self, id: HookId) -> bool;
}

/// The player character holding the rod.
pub trait Angler: Send + Sync {
    /// Commits a reel input.
    ///
    /// # Errors
    ///
    /// Returns [`ReelError::NotFishing`] when the player is not in a
    /// fishing-capable state, and [`ReelError::Failed`] for any other fault.
    fn reel(&self) -> Result<(), ReelError>;
}

/// Engine objects injected into the automation core.
#[derive(Clone)]
pub struct EngineHandles {
    /// Minigame controller.
    pub controller: Arc<dyn FishingController>,
    /// Local player.
    pub angler: Arc<dyn Angler>,
}

impl EngineHandles {
    /// Bundles a controller and an angler.
    #[must_use]
    pub fn new(controller: Arc<dyn FishingController>, angler: Arc<dyn Angler>) -> Self {
        Self { controller, angler }
    }
}

impl std::fmt::Debug for EngineHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandles")
            .field("controller_available", &self.controller.is_available())
            .finish_non_exhaustive()
    }
}
