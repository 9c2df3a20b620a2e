//! Configuration loader
//!
//! Loading pipeline:
//! 1. Read the YAML file (optional; defaults when absent)
//! 2. Deserialize to typed config
//! 3. Apply `AUTOFISHER_*` environment overrides
//! 4. Validation
//! 5. Freeze with `Arc`

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::schema::AutofisherConfig;
use crate::config::validation::Validator;
use crate::error::ConfigError;

/// Environment variable overriding `automation.enabled`.
pub const ENV_ENABLED: &str = "AUTOFISHER_ENABLED";

/// Environment variable overriding `automation.reaction_delay`.
pub const ENV_REACTION_DELAY: &str = "AUTOFISHER_REACTION_DELAY";

/// Environment variable overriding `automation.bite_poll_interval`.
pub const ENV_BITE_POLL_INTERVAL: &str = "AUTOFISHER_BITE_POLL_INTERVAL";

/// Environment variable overriding `automation.controller_poll_interval`.
pub const ENV_CONTROLLER_POLL_INTERVAL: &str = "AUTOFISHER_CONTROLLER_POLL_INTERVAL";

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// The frozen configuration.
    pub config: Arc<AutofisherConfig>,

    /// Non-fatal issues found while loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Configuration loader.
///
/// Environment lookups go through an injected function so tests can supply
/// overrides without touching the process environment.
pub struct ConfigLoader {
    env: Box<dyn Fn(&str) -> Option<String> + Send + Sync>,
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader").finish_non_exhaustive()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader reading overrides from the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(|name| std::env::var(name).ok())
    }

    /// Creates a loader with a custom environment lookup.
    #[must_use]
    pub fn with_env(env: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self { env: Box::new(env) }
    }

    /// Loads the configuration, falling back to defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - YAML parsing fails
    /// - An environment override is malformed
    /// - Validation fails
    pub fn load(&self, path: Option<&Path>) -> Result<LoadResult, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => AutofisherConfig::default(),
        };

        self.apply_env_overrides(&mut config)?;

        let result = Validator::new().validate(&config);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string()),
                errors: result.errors,
            });
        }

        let warnings = result
            .warnings
            .into_iter()
            .map(|issue| LoadWarning {
                message: issue.message,
                location: Some(issue.path),
            })
            .collect();

        Ok(LoadResult {
            config: Arc::new(config),
            warnings,
        })
    }

    fn read_file(path: &Path) -> Result<AutofisherConfig, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        // Handle UTF-8 BOM
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

        if raw.trim().is_empty() {
            return Ok(AutofisherConfig::default());
        }

        serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })
    }

    fn apply_env_overrides(&self, config: &mut AutofisherConfig) -> Result<(), ConfigError> {
        let automation = &mut config.automation;

        if let Some(raw) = (self.env)(ENV_ENABLED) {
            automation.enabled = parse_bool(ENV_ENABLED, &raw)?;
        }
        if let Some(raw) = (self.env)(ENV_REACTION_DELAY) {
            automation.reaction_delay = parse_duration(ENV_REACTION_DELAY, &raw)?;
        }
        if let Some(raw) = (self.env)(ENV_BITE_POLL_INTERVAL) {
            automation.bite_poll_interval = parse_duration(ENV_BITE_POLL_INTERVAL, &raw)?;
        }
        if let Some(raw) = (self.env)(ENV_CONTROLLER_POLL_INTERVAL) {
            automation.controller_poll_interval =
                parse_duration(ENV_CONTROLLER_POLL_INTERVAL, &raw)?;
        }

        Ok(())
    }
}

fn parse_bool(field: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
            expected: "a boolean (true/false, 1/0, yes/no, on/off)".to_string(),
        }),
    }
}

fn parse_duration(field: &str, raw: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(raw.trim()).map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        expected: "a duration such as '100ms' or '1s'".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn loader_with(vars: &[(&str, &str)]) -> ConfigLoader {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConfigLoader::with_env(move |name| vars.get(name).cloned())
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_no_path_yields_defaults() {
        let result = loader_with(&[]).load(None).unwrap();
        assert_eq!(*result.config, AutofisherConfig::default());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config("automation:\n  enabled: false\n  reaction_delay: 80ms\n");
        let result = loader_with(&[]).load(Some(file.path())).unwrap();
        assert!(!result.config.automation.enabled);
        assert_eq!(
            result.config.automation.reaction_delay,
            Duration::from_millis(80)
        );
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = write_config("\u{feff}\n");
        let result = loader_with(&[]).load(Some(file.path())).unwrap();
        assert_eq!(*result.config, AutofisherConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let err = loader_with(&[])
            .load(Some(Path::new("/nonexistent/autofisher.yaml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let file = write_config("automation:\n  enabled: [unclosed\n");
        let err = loader_with(&[]).load(Some(file.path())).unwrap_err();
        match err {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("automation:\n  enabled: true\n");
        let loader = loader_with(&[(ENV_ENABLED, "off"), (ENV_REACTION_DELAY, "150ms")]);
        let result = loader.load(Some(file.path())).unwrap();
        assert!(!result.config.automation.enabled);
        assert_eq!(
            result.config.automation.reaction_delay,
            Duration::from_millis(150)
        );
    }

    #[test]
    fn test_malformed_env_override() {
        let err = loader_with(&[(ENV_BITE_POLL_INTERVAL, "often")])
            .load(None)
            .unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, ENV_BITE_POLL_INTERVAL),
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_failure_surfaces_all_errors() {
        let file = write_config("automation:\n  reaction_delay: 0s\n  bite_poll_interval: 0s\n");
        let err = loader_with(&[]).load(Some(file.path())).unwrap_err();
        match err {
            ConfigError::ValidationError { errors, .. } => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_warnings_are_returned() {
        let loader = loader_with(&[(ENV_REACTION_DELAY, "3s")]);
        let result = loader.load(None).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].to_string().contains("reaction_delay"));
    }
}
