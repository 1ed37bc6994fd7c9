//! Configuration management for focusdeck.
//!
//! This module handles loading and saving configuration from `~/.focusdeck/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ColorSetting, Config, GeneralConfig, TimerSettings};
