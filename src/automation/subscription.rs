//! Scoped registration of the two controller hooks.

use std::sync::Arc;

use tracing::debug;

use crate::engine::{CritHook, FishingController, HookId, StateHook};

/// Both hooks registered with the controller, removed together exactly once.
///
/// Dropping a `Subscription` releases it.
pub struct Subscription {
    controller: Arc<dyn FishingController>,
    hooks: Option<(HookId, HookId)>,
}

impl Subscription {
    /// Registers the phase-change and crit hooks.
    #[must_use]
    pub fn register(
        controller: Arc<dyn FishingController>,
        state_hook: StateHook,
        crit_hook: CritHook,
    ) -> Self {
        let state_id = controller.add_state_hook(state_hook);
        let crit_id = controller.add_crit_hook(crit_hook);
        debug!(%state_id, %crit_id, "controller hooks registered");
        Self {
            controller,
            hooks: Some((state_id, crit_id)),
        }
    }

    /// Whether the hooks are still registered.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.hooks.is_some()
    }

    /// Removes both hooks. Returns `false` if already released.
    pub fn release(&mut self) -> bool {
        let Some((state_id, crit_id)) = self.hooks.take() else {
            return false;
        };
        let removed_state = self.controller.remove_hook(state_id);
        let removed_crit = self.controller.remove_hook(crit_id);
        debug!(
            %state_id,
            %crit_id,
            removed_state,
            removed_crit,
            "controller hooks removed"
        );
        true
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
