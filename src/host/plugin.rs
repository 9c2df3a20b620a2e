//! Host plugin lifecycle.
//!
//! Ties the automation core to the host's scene and shutdown notifications.

use std::sync::Arc;

use tracing::info;

use crate::automation::{Automation, EnabledFlag, Timing};
use crate::config::AutomationConfig;
use crate::engine::EngineHandles;
use crate::error::AutomationError;
use crate::observability::EventEmitter;

use super::scene::SceneFilter;

/// The automation as loaded into a host process.
///
/// Dropping the plugin shuts it down.
#[derive(Debug)]
pub struct Plugin {
    automation: Automation,
    scenes: SceneFilter,
    enabled: EnabledFlag,
}

impl Plugin {
    /// Builds the core from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn load(
        engine: EngineHandles,
        config: &AutomationConfig,
        events: Option<Arc<EventEmitter>>,
    ) -> Result<Self, AutomationError> {
        let enabled = EnabledFlag::new(config.enabled);
        let automation = Automation::new(engine, Timing::from(config), enabled.clone(), events)?;

        info!(
            name = env!("CARGO_PKG_NAME"),
            version = env!("CARGO_PKG_VERSION"),
            enabled = config.enabled,
            "plugin loaded"
        );

        Ok(Self {
            automation,
            scenes: SceneFilter::new(config.excluded_scenes.iter().cloned()),
            enabled,
        })
    }

    /// Handles a scene load; every load is a session boundary.
    pub fn on_scene_loaded(&self, scene: &str) {
        let eligible = self.scenes.is_gameplay_scene(scene);
        info!(scene, eligible, "scene loaded");
        self.automation.on_session_boundary(eligible);
    }

    /// Flips the enable flag. Subscription follows at the next scene load.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
        info!(enabled, "automation toggled");
    }

    /// Current enable flag.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// The automation core.
    #[must_use]
    pub const fn automation(&self) -> &Automation {
        &self.automation
    }

    /// Releases all hooks. Safe to call more than once.
    pub fn shutdown(&self) {
        self.automation.shutdown();
        info!("plugin unloaded");
    }
}

impl Drop for Plugin {
    fn drop(&mut self) {
        self.automation.shutdown();
    }
}
