//! Configuration validation
//!
//! Runs on the fully deserialized [`AutofisherConfig`] and collects every
//! issue instead of stopping at the first one.

use std::time::Duration;

use crate::config::schema::{AutofisherConfig, AutomationConfig, SimulationConfig};
use crate::error::{Severity, ValidationIssue};

/// Reaction delays above this are legal but no longer look human.
const SLOW_REACTION: Duration = Duration::from_secs(1);

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns the result.
    pub fn validate(&mut self, config: &AutofisherConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_automation(&config.automation);
        self.validate_simulation(&config.simulation);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_automation(&mut self, automation: &AutomationConfig) {
        self.require_nonzero("automation.reaction_delay", automation.reaction_delay);
        self.require_nonzero(
            "automation.bite_poll_interval",
            automation.bite_poll_interval,
        );
        self.require_nonzero(
            "automation.controller_poll_interval",
            automation.controller_poll_interval,
        );

        if automation.reaction_delay > SLOW_REACTION {
            self.warning(
                "automation.reaction_delay",
                format!(
                    "{} is slower than a human reaction; good crits may expire",
                    humantime::format_duration(automation.reaction_delay)
                ),
            );
        }

        for (i, scene) in automation.excluded_scenes.iter().enumerate() {
            if scene.trim().is_empty() {
                self.error(
                    &format!("automation.excluded_scenes[{i}]"),
                    "scene name is empty".to_string(),
                );
            }
        }
    }

    fn validate_simulation(&mut self, sim: &SimulationConfig) {
        if sim.bite_delay_min > sim.bite_delay_max {
            self.error(
                "simulation.bite_delay_min",
                "must not exceed simulation.bite_delay_max".to_string(),
            );
        }

        self.require_nonzero("simulation.crit_spacing", sim.crit_spacing);
        self.require_nonzero("simulation.crit_window", sim.crit_window);

        if sim.total_crit_weight() == 0 {
            self.error(
                "simulation.good_weight",
                "at least one crit weight must be positive".to_string(),
            );
        }

        if sim.reels_to_win == 0 {
            self.error(
                "simulation.reels_to_win",
                "must be at least 1".to_string(),
            );
        } else if sim.max_crits < sim.reels_to_win {
            self.warning(
                "simulation.max_crits",
                "fewer crits than reels needed; every round will be lost".to_string(),
            );
        }

        if sim.rounds == 0 {
            self.warning("simulation.rounds", "no rounds will be played".to_string());
        }
    }

    fn require_nonzero(&mut self, path: &str, value: Duration) {
        if value.is_zero() {
            self.error(path, "must be greater than zero".to_string());
        }
    }

    fn error(&mut self, path: &str, message: String) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message,
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, path: &str, message: String) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message,
            severity: Severity::Warning,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(config: &AutofisherConfig) -> ValidationResult {
        Validator::new().validate(config)
    }

    #[test]
    fn test_defaults_are_valid() {
        let result = validate(&AutofisherConfig::default());
        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_zero_durations_are_errors() {
        let mut config = AutofisherConfig::default();
        config.automation.reaction_delay = Duration::ZERO;
        config.automation.bite_poll_interval = Duration::ZERO;

        let result = validate(&config);
        assert_eq!(result.errors.len(), 2);
        assert!(
            result
                .errors
                .iter()
                .any(|e| e.path == "automation.reaction_delay")
        );
    }

    #[test]
    fn test_slow_reaction_is_warning() {
        let mut config = AutofisherConfig::default();
        config.automation.reaction_delay = Duration::from_secs(2);

        let result = validate(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_empty_scene_name_is_error() {
        let mut config = AutofisherConfig::default();
        config.automation.excluded_scenes.push("  ".to_string());

        let result = validate(&config);
        assert!(result.has_errors());
        assert_eq!(result.errors[0].path, "automation.excluded_scenes[4]");
    }

    #[test]
    fn test_inverted_bite_range_is_error() {
        let mut config = AutofisherConfig::default();
        config.simulation.bite_delay_min = Duration::from_secs(5);
        config.simulation.bite_delay_max = Duration::from_secs(1);

        assert!(validate(&config).has_errors());
    }

    #[test]
    fn test_collects_all_issues() {
        let mut config = AutofisherConfig::default();
        config.automation.reaction_delay = Duration::ZERO;
        config.simulation.good_weight = 0;
        config.simulation.bad_weight = 0;
        config.simulation.miss_weight = 0;
        config.simulation.reels_to_win = 0;

        let result = validate(&config);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_huge_crit_weights_do_not_overflow() {
        let mut config = AutofisherConfig::default();
        config.simulation.good_weight = u32::MAX;
        config.simulation.bad_weight = 1;
        config.simulation.miss_weight = u32::MAX;

        let result = validate(&config);
        assert!(result.is_valid(), "{:?}", result.errors);
        assert_eq!(
            config.simulation.total_crit_weight(),
            2 * u64::from(u32::MAX) + 1
        );
    }
}
