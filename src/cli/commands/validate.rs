//! `validate` command

use crate::cli::args::ValidateArgs;
use crate::config::ConfigLoader;
use crate::error::{AutofisherError, ConfigError};

/// Validates a configuration file, including environment overrides.
///
/// # Errors
///
/// Returns an error if the file is missing, cannot be parsed, or fails
/// validation.
pub fn run(args: &ValidateArgs) -> Result<(), AutofisherError> {
    if !args.config.exists() {
        return Err(ConfigError::MissingFile {
            path: args.config.clone(),
        }
        .into());
    }
    tracing::info!(file = %args.config.display(), "validating configuration");

    let loaded = match ConfigLoader::new().load(Some(&args.config)) {
        Ok(loaded) => loaded,
        Err(ConfigError::ValidationError { path, errors }) => {
            for issue in &errors {
                eprintln!("  {issue}");
            }
            return Err(ConfigError::ValidationError { path, errors }.into());
        }
        Err(e) => return Err(e.into()),
    };

    for warning in &loaded.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    println!("{}: valid", args.config.display());
    if args.show {
        print!("{}", serde_yaml::to_string(loaded.config.as_ref())?);
    }
    Ok(())
}
