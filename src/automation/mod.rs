//! Reactive fishing automation
//!
//! The core state machine that reacts to the engine's phase and crit
//! notifications.
//!
//! # Architecture
//!
//! - [`AutomationSession`]: Atomic shared state (enabled, subscribed, waiting, epochs)
//! - [`SessionGate`]: Owns the hook registration across scene boundaries
//! - [`PhaseTracker`]: Reacts to phase notifications, arms the bite watch
//! - [`BiteMonitor`]: Polls the line while in pregame and hooks the first bite
//! - [`ReactionResponder`]: Reels after a delay on good crits
//!
//! Every component shares one [`Core`] and spawns its suspensions on the
//! runtime captured when [`Automation`] was built.

pub mod gate;
pub mod monitor;
pub mod responder;
pub mod session;
pub mod subscription;
pub mod tracker;

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::config::AutomationConfig;
use crate::engine::EngineHandles;
use crate::error::AutomationError;
use crate::observability::{Event, EventEmitter};

pub use gate::SessionGate;
pub use monitor::{BiteMonitor, BiteWatchOutcome};
pub use responder::{ReactionResponder, ReelOutcome};
pub use session::{AutomationSession, EnabledFlag, Epoch};
pub use subscription::Subscription;
pub use tracker::PhaseTracker;

/// Fixed durations used by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay between a good crit and the reel
    pub reaction_delay: Duration,
    /// Interval between line reads while waiting for a bite
    pub bite_poll_interval: Duration,
    /// Interval between controller availability checks
    pub controller_poll_interval: Duration,
}

impl From<&AutomationConfig> for Timing {
    fn from(config: &AutomationConfig) -> Self {
        Self {
            reaction_delay: config.reaction_delay,
            bite_poll_interval: config.bite_poll_interval,
            controller_poll_interval: config.controller_poll_interval,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from(&AutomationConfig::default())
    }
}

/// State and collaborators shared by every automation component.
#[derive(Debug)]
pub struct Core {
    pub(crate) session: AutomationSession,
    pub(crate) engine: EngineHandles,
    pub(crate) timing: Timing,
    pub(crate) events: Option<Arc<EventEmitter>>,
    pub(crate) runtime: Handle,
}

impl Core {
    pub(crate) fn emit(&self, event: Event) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

/// The automation core, wired to an engine.
#[derive(Debug)]
pub struct Automation {
    core: Arc<Core>,
    gate: Arc<SessionGate>,
}

impl Automation {
    /// Builds the core on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn new(
        engine: EngineHandles,
        timing: Timing,
        enabled: EnabledFlag,
        events: Option<Arc<EventEmitter>>,
    ) -> Result<Self, AutomationError> {
        let runtime =
            Handle::try_current().map_err(|e| AutomationError::NoRuntime(e.to_string()))?;

        let core = Arc::new(Core {
            session: AutomationSession::new(enabled),
            engine,
            timing,
            events,
            runtime,
        });
        let gate = Arc::new(SessionGate::new(Arc::clone(&core)));

        Ok(Self { core, gate })
    }

    /// Handles a scene/session change. See [`SessionGate::on_session_boundary`].
    pub fn on_session_boundary(&self, is_valid_context: bool) {
        self.gate.on_session_boundary(is_valid_context);
    }

    /// Releases every hook and voids all pending tasks.
    pub fn shutdown(&self) {
        self.gate.shutdown();
    }

    /// Shared session state.
    #[must_use]
    pub fn session(&self) -> &AutomationSession {
        &self.core.session
    }

    /// The session gate.
    #[must_use]
    pub const fn gate(&self) -> &Arc<SessionGate> {
        &self.gate
    }

    /// A phase tracker bound to this core, for direct event injection.
    #[must_use]
    pub fn tracker(&self) -> PhaseTracker {
        PhaseTracker::new(Arc::clone(&self.core))
    }

    /// A reaction responder bound to this core, for direct event injection.
    #[must_use]
    pub fn responder(&self) -> ReactionResponder {
        ReactionResponder::new(Arc::clone(&self.core))
    }

    /// A bite monitor bound to this core.
    #[must_use]
    pub fn monitor(&self) -> BiteMonitor {
        BiteMonitor::new(Arc::clone(&self.core))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedEngine;

    #[test]
    fn test_new_outside_runtime_fails() {
        let engine = Arc::new(SimulatedEngine::new());
        let result = Automation::new(
            engine.handles(),
            Timing::default(),
            EnabledFlag::default(),
            None,
        );
        assert!(matches!(result, Err(AutomationError::NoRuntime(_))));
    }

    #[tokio::test]
    async fn test_new_inside_runtime() {
        let engine = Arc::new(SimulatedEngine::new());
        let automation = Automation::new(
            engine.handles(),
            Timing::default(),
            EnabledFlag::default(),
            None,
        )
        .unwrap();
        assert!(!automation.session().is_subscribed());
    }

    #[test]
    fn test_timing_from_config() {
        let config = AutomationConfig {
            reaction_delay: Duration::from_millis(120),
            ..AutomationConfig::default()
        };
        let timing = Timing::from(&config);
        assert_eq!(timing.reaction_delay, Duration::from_millis(120));
        assert_eq!(timing.bite_poll_interval, Duration::from_millis(50));
    }
}
