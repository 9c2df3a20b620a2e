//! Configuration schema types
//!
//! Deserialized from an optional YAML file. Every field has a default so an
//! empty `automation:` section, or no file at all, yields a working setup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Scene names that never host the fishing minigame.
pub const DEFAULT_EXCLUDED_SCENES: [&str; 4] = ["MainMenu", "LoadingScreen", "Boot", "Intro"];

// ============================================================================
// Root
// ============================================================================

/// Root configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutofisherConfig {
    /// Settings read by the automation core
    pub automation: AutomationConfig,

    /// Settings for the simulated engine used by `autofisher run`
    pub simulation: SimulationConfig,
}

// ============================================================================
// Automation
// ============================================================================

/// Settings read by the automation core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutomationConfig {
    /// Initial value of the enable flag
    pub enabled: bool,

    /// Simulated human reaction time before reeling on a good crit
    #[serde(with = "humantime_str")]
    pub reaction_delay: Duration,

    /// Cadence of line-state reads while waiting for a bite
    #[serde(with = "humantime_str")]
    pub bite_poll_interval: Duration,

    /// Cadence of controller availability checks after a scene change
    #[serde(with = "humantime_str")]
    pub controller_poll_interval: Duration,

    /// Scenes in which automation stays detached
    pub excluded_scenes: Vec<String>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reaction_delay: Duration::from_millis(100),
            bite_poll_interval: Duration::from_millis(50),
            controller_poll_interval: Duration::from_millis(16),
            excluded_scenes: DEFAULT_EXCLUDED_SCENES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Settings for the simulated fishing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of fishing rounds to play
    pub rounds: u32,

    /// RNG seed; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Delay before the controller appears after a scene load
    #[serde(with = "humantime_str")]
    pub controller_delay: Duration,

    /// Shortest wait between entering pregame and the bite
    #[serde(with = "humantime_str")]
    pub bite_delay_min: Duration,

    /// Longest wait between entering pregame and the bite
    #[serde(with = "humantime_str")]
    pub bite_delay_max: Duration,

    /// Pause between two crit windows
    #[serde(with = "humantime_str")]
    pub crit_spacing: Duration,

    /// How long after a good crit a reel still counts
    #[serde(with = "humantime_str")]
    pub crit_window: Duration,

    /// Relative weight of good crits
    pub good_weight: u32,

    /// Relative weight of bad crits
    pub bad_weight: u32,

    /// Relative weight of missed crits
    pub miss_weight: u32,

    /// Good reels needed to land the fish
    pub reels_to_win: u32,

    /// Crit windows shown before the fish escapes
    pub max_crits: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 5,
            seed: None,
            controller_delay: Duration::from_millis(200),
            bite_delay_min: Duration::from_millis(300),
            bite_delay_max: Duration::from_millis(1500),
            crit_spacing: Duration::from_millis(400),
            crit_window: Duration::from_millis(250),
            good_weight: 3,
            bad_weight: 1,
            miss_weight: 1,
            reels_to_win: 3,
            max_crits: 12,
        }
    }
}

impl SimulationConfig {
    /// Sum of the three crit weights, widened so it cannot overflow.
    #[must_use]
    pub fn total_crit_weight(&self) -> u64 {
        u64::from(self.good_weight) + u64::from(self.bad_weight) + u64::from(self.miss_weight)
    }
}

// ============================================================================
// Duration (de)serialization
// ============================================================================

/// Serializes `Duration` as a humantime string such as `"100ms"`.
mod humantime_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim())
            .map_err(|e| D::Error::custom(format!("invalid duration '{raw}': {e}")))
    }
}

// ============================================================================
// Tests
// ============================================================================
