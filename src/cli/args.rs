//! CLI argument definitions
//!
//! All Clap derive structs for `autofisher` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Reactive automation for a timed fishing minigame.
#[derive(Parser, Debug)]
#[command(name = "autofisher", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "AUTOFISHER_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "AUTOFISHER_LOG_FORMAT")]
    pub log_format: OutputFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the automation against the simulated fishing engine.
    Run(RunArgs),

    /// Validate a configuration file.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Run / Validate
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "AUTOFISHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of rounds to play (overrides the config file).
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// RNG seed for the simulated engine (overrides the config file).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with automation disabled.
    #[arg(long)]
    pub disabled: bool,

    /// Write JSONL automation events to this file.
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Expose Prometheus metrics on 127.0.0.1:<port>.
    #[arg(long, env = "AUTOFISHER_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Summary output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to YAML configuration file.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Print the effective configuration after validation.
    #[arg(long)]
    pub show: bool,
}

// ============================================================================
// Utility Commands
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

/// Exit code for a failed parse: `--help` and `--version` succeed, anything
/// else is a usage error.
#[must_use]
pub fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        crate::error::ExitCode::USAGE_ERROR
    } else {
        crate::error::ExitCode::SUCCESS
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_config() {
        let result = Cli::try_parse_from(["autofisher", "validate"]);
        assert!(result.is_err(), "Expected error for missing config");
    }

    #[test]
    fn test_parse_exit_codes() {
        use crate::error::ExitCode;

        let err = Cli::try_parse_from(["autofisher", "run", "--rounds", "many"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), ExitCode::USAGE_ERROR);

        let err = Cli::try_parse_from(["autofisher", "--help"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), ExitCode::SUCCESS);

        let err = Cli::try_parse_from(["autofisher", "--version"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), ExitCode::SUCCESS);
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["autofisher", "run"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert!(args.rounds.is_none());
                assert!(!args.disabled);
                assert_eq!(args.format, OutputFormat::Human);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from([
            "autofisher",
            "run",
            "--rounds",
            "3",
            "--seed",
            "42",
            "--disabled",
            "--format",
            "json",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.rounds, Some(3));
        assert_eq!(args.seed, Some(42));
        assert!(args.disabled);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["autofisher", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::try_parse_from(["autofisher", "-vvv", "run"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::try_parse_from(["autofisher", "--quiet", "version"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_exit_code_mapping() {
        use crate::error::{AutofisherError, AutomationError, ConfigError, ExitCode};

        let cases: Vec<(AutofisherError, i32)> = vec![
            (
                ConfigError::MissingFile {
                    path: PathBuf::from("/x"),
                }
                .into(),
                ExitCode::CONFIG_ERROR,
            ),
            (
                AutomationError::NoRuntime("x".into()).into(),
                ExitCode::AUTOMATION_ERROR,
            ),
            (
                std::io::Error::new(std::io::ErrorKind::NotFound, "x").into(),
                ExitCode::IO_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.exit_code(), expected, "Wrong exit code for {err}");
        }
    }
}
