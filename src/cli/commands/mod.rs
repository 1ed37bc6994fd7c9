//! Command implementations for focusdeck.

mod completions;
mod config;
mod focus;

pub use completions::completions;
pub use config::{config, config_at};
pub use focus::{clear, history, report, run, status};
