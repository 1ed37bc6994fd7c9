//! Tracing setup.
//!
//! The filter comes from `FOCUSDECK_LOG` when set (for example
//! `FOCUSDECK_LOG=focusdeck=debug`), otherwise `info` with `--verbose` and
//! `warn` without.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::FocusError;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FOCUSDECK_LOG";

/// Where log lines go.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Standard error, for line-oriented commands.
    Stderr,
    /// Appended to a file, while the TUI owns the terminal.
    File(&'a Path),
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }))
}

/// Install the global subscriber. A second call is a no-op.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(verbose: bool, target: LogTarget<'_>) -> Result<(), FocusError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbose))
        .with_target(false)
        .with_thread_ids(false);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    if installed.is_err() {
        tracing::debug!("subscriber already installed");
    }
    Ok(())
}
