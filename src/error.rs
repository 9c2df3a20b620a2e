//! Error types for `autofisher`
//!
//! The reactive core never returns errors to the engine: faults are logged
//! and contained where they happen. The types here cover construction, the
//! engine's reel command, configuration loading, and CLI exit codes.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `autofisher` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Automation core could not be started
    pub const AUTOMATION_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `autofisher` operations.
#[derive(Debug, Error)]
pub enum AutofisherError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Automation core error
    #[error(transparent)]
    Automation(#[from] AutomationError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AutofisherError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Automation(AutomationError::Interrupted) => ExitCode::INTERRUPTED,
            Self::Automation(_) => ExitCode::AUTOMATION_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "reaction_delay")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - validation failure that prevents configuration from being used
    Error,
    /// Warning - potential issue that does not prevent configuration loading
    Warning,
}

// ============================================================================
// Automation Errors
// ============================================================================

/// Errors raised while building the automation core.
#[derive(Debug, Error)]
pub enum AutomationError {
    /// The core spawns its waits on a tokio runtime and none was found
    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),

    /// The controller hooks did not attach in time
    #[error("controller hooks not attached after {0:?}")]
    SubscribeTimeout(std::time::Duration),

    /// The run was cancelled by a shutdown signal
    #[error("interrupted")]
    Interrupted,
}

// ============================================================================
// Engine Command Errors
// ============================================================================

/// Failures of the engine's reel command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReelError {
    /// The player is not holding a cast rod
    #[error("player is not in a fishing state")]
    NotFishing,

    /// Any other fault raised by the engine
    #[error("reel failed: {0}")]
    Failed(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::AUTOMATION_ERROR, 5);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
        assert_eq!(ExitCode::INTERRUPTED, 130);
        assert_eq!(ExitCode::TERMINATED, 143);
    }

    #[test]
    fn test_automation_error_exit_code() {
        let err: AutofisherError = AutomationError::NoRuntime("test".to_string()).into();
        assert_eq!(err.exit_code(), ExitCode::AUTOMATION_ERROR);
    }

    #[test]
    fn test_interrupted_exit_code() {
        let err: AutofisherError = AutomationError::Interrupted.into();
        assert_eq!(err.exit_code(), ExitCode::INTERRUPTED);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: AutofisherError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: AutofisherError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "reaction_delay".to_string(),
            message: "must be greater than zero".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(
            issue.to_string(),
            "error: must be greater than zero at reaction_delay"
        );
    }

    #[test]
    fn test_validation_issue_warning_display() {
        let issue = ValidationIssue {
            path: "reaction_delay".to_string(),
            message: "slower than a human".to_string(),
            severity: Severity::Warning,
        };
        assert_eq!(
            issue.to_string(),
            "warning: slower than a human at reaction_delay"
        );
    }

    #[test]
    fn test_reel_error_display() {
        assert_eq!(
            ReelError::NotFishing.to_string(),
            "player is not in a fishing state"
        );
        assert!(
            ReelError::Failed("rod snapped".into())
                .to_string()
                .contains("rod snapped")
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("autofisher.yaml"),
            line: Some(3),
            message: "unexpected token".to_string(),
        };
        assert!(err.to_string().contains("autofisher.yaml"));
        assert!(err.to_string().contains("unexpected token"));
    }
}
