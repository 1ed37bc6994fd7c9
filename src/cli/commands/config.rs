//! Settings command implementation.

use colored::Colorize;
use tracing::info;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::FocusError;
use crate::output::to_json;

/// Execute config subcommands against the default settings file.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or written, or a
/// value is rejected.
pub fn config(cmd: ConfigCommands, format: OutputFormat) -> Result<String, FocusError> {
    let paths = Paths::new()?;
    config_at(&paths, cmd, format)
}

/// Execute config subcommands against the settings file under `paths`.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or written, or a
/// value is rejected.
pub fn config_at(paths: &Paths, cmd: ConfigCommands, format: OutputFormat) -> Result<String, FocusError> {
    match cmd {
        ConfigCommands::Show => {
            let config = Config::load_from_path(&paths.config_file)?;
            show(&config, format)
        }

        ConfigCommands::Path => match format {
            OutputFormat::Json => to_json(&paths.config_file),
            OutputFormat::Pretty => Ok(paths.config_file.display().to_string()),
        },

        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_from_path(&paths.config_file)?;
            config.set_value(&key, &value)?;
            paths.ensure_dirs()?;
            config.save_to_path(&paths.config_file)?;
            info!(%key, %value, "setting changed");

            match format {
                OutputFormat::Json => to_json(&config),
                OutputFormat::Pretty => Ok(format!("{} {key} = {value}", "✓".green())),
            }
        }

        ConfigCommands::Reset => {
            let config = Config::default();
            paths.ensure_dirs()?;
            config.save_to_path(&paths.config_file)?;
            info!("settings reset");

            match format {
                OutputFormat::Json => to_json(&config),
                OutputFormat::Pretty => Ok(format!("{} Settings restored to defaults", "✓".green())),
            }
        }
    }
}

fn show(config: &Config, format: OutputFormat) -> Result<String, FocusError> {
    match format {
        OutputFormat::Json => to_json(config),
        OutputFormat::Pretty => Ok(serde_yaml::to_string(config)?.trim_end().to_string()),
    }
}
