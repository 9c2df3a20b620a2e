//! Logging setup for the `autofisher` binary.
//!
//! Automation decisions (hooked bites, reels, round outcomes) log under
//! `autofisher::automation` and stay visible at the default verbosity.
//! `-v` flags raise the crate's own level while dependencies stay one step
//! quieter. `AUTOFISHER_LOG_LEVEL` replaces the whole filter.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable holding a full filter directive.
pub const LOG_LEVEL_ENV: &str = "AUTOFISHER_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Filter directive for a `-v` count.
///
/// | verbosity | dependencies | `autofisher` | `autofisher::automation` |
/// |-----------|--------------|--------------|--------------------------|
/// | 0         | warn         | warn         | info                     |
/// | 1         | warn         | info         | info                     |
/// | 2         | info         | debug        | debug                    |
/// | 3+        | debug        | trace        | trace                    |
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,autofisher::automation=info",
        1 => "warn,autofisher=info",
        2 => "info,autofisher=debug",
        _ => "debug,autofisher=trace",
    }
}

/// Builds the event filter: `AUTOFISHER_LOG_LEVEL` when it parses, else the
/// directive for `verbosity`.
fn build_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)))
}

/// Installs the global subscriber on stderr.
///
/// Module targets are shown from `-vv` up, where the automation components
/// interleave. Safe to call twice; the second call is a no-op.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = build_filter(verbosity);
    let show_target = verbosity >= 2;

    let use_ansi = match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(show_target)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Human => builder.with_ansi(use_ansi).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
