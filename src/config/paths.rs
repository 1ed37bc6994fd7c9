//! Path resolution for focusdeck configuration and data files.
//!
//! All focusdeck data is stored in `~/.focusdeck/`:
//! - `config.yaml` - Main configuration file
//! - `focusdeck.db` - SQLite database holding the session ledger
//! - `focusdeck.log` - Log output while the TUI owns the terminal

use std::path::PathBuf;

use crate::error::FocusError;

/// Paths to focusdeck configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.focusdeck/`
    pub root: PathBuf,
    /// Config file: `~/.focusdeck/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.focusdeck/focusdeck.db`
    pub database: PathBuf,
    /// Log file: `~/.focusdeck/focusdeck.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, FocusError> {
        let home = std::env::var("HOME").map_err(|_| {
            FocusError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".focusdeck")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("focusdeck.db"),
            log_file: root.join("focusdeck.log"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), FocusError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                FocusError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".focusdeck"))
        })
    }
}
