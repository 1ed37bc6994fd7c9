//! Configuration settings for focusdeck.
//!
//! Settings are loaded from `~/.focusdeck/config.yaml`.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::FocusError;
use crate::features::focus::{parse_duration, TimerPhase};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Focus timer settings.
    pub timer: TimerSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Force colors on or off for this process. `Auto` leaves detection to the terminal.
    pub fn apply(self) {
        match self {
            Self::Auto => {}
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Focus timer settings.
///
/// A snapshot consulted whenever a phase starts or resets. The timer never
/// writes to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimerSettings {
    /// Work phase length in minutes.
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Short break length in minutes.
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u32,
    /// Long break length in minutes.
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u32,
    /// Number of completed work phases before a long break.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    /// Ring the terminal bell when a phase completes.
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// Sound volume, 0-100.
    #[serde(default = "default_volume")]
    pub sound_volume: u8,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_work_minutes() -> u32 {
    25
}

const fn default_short_break() -> u32 {
    5
}

const fn default_long_break() -> u32 {
    15
}

const fn default_long_break_interval() -> u32 {
    4
}

const fn default_true() -> bool {
    true
}

const fn default_volume() -> u8 {
    50
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            long_break_interval: default_long_break_interval(),
            sound_enabled: default_true(),
            sound_volume: default_volume(),
        }
    }
}

impl TimerSettings {
    /// Length of `phase` in seconds.
    ///
    /// Never returns 0, so a phase can't complete the instant it starts.
    #[must_use]
    pub const fn duration(&self, phase: TimerPhase) -> u32 {
        let minutes = match phase {
            TimerPhase::Work => self.work_minutes,
            TimerPhase::ShortBreak => self.short_break_minutes,
            TimerPhase::LongBreak => self.long_break_minutes,
        };
        let seconds = minutes.saturating_mul(60);
        if seconds == 0 {
            1
        } else {
            seconds
        }
    }

    /// Long break cadence, never below 1.
    #[must_use]
    pub const fn cadence(&self) -> u32 {
        if self.long_break_interval == 0 {
            1
        } else {
            self.long_break_interval
        }
    }

    /// Return a copy with every value pulled into its valid range.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            work_minutes: self.work_minutes.max(1),
            short_break_minutes: self.short_break_minutes.max(1),
            long_break_minutes: self.long_break_minutes.max(1),
            long_break_interval: self.long_break_interval.max(1),
            sound_enabled: self.sound_enabled,
            sound_volume: self.sound_volume.min(100),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, FocusError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    /// Out-of-range timer values are clamped on load.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, FocusError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            FocusError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let mut config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            FocusError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;
        config.timer = config.timer.sanitized();
        Ok(config)
    }

    /// Save configuration to the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save(&self) -> Result<(), FocusError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        self.save_to_path(&paths.config_file)
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), FocusError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| FocusError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            FocusError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Set a single value by its dotted key, e.g. `timer.work_minutes`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or values outside the accepted range.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), FocusError> {
        match key {
            "general.default_output" => {
                self.general.default_output = match value.to_lowercase().as_str() {
                    "pretty" => OutputFormat::Pretty,
                    "json" => OutputFormat::Json,
                    _ => return Err(invalid_value(key, value, "pretty or json")),
                };
            }
            "general.color" => {
                self.general.color = match value.to_lowercase().as_str() {
                    "auto" => ColorSetting::Auto,
                    "always" => ColorSetting::Always,
                    "never" => ColorSetting::Never,
                    _ => return Err(invalid_value(key, value, "auto, always or never")),
                };
            }
            "timer.work_minutes" => self.timer.work_minutes = parse_minutes(key, value)?,
            "timer.short_break_minutes" => {
                self.timer.short_break_minutes = parse_minutes(key, value)?;
            }
            "timer.long_break_minutes" => {
                self.timer.long_break_minutes = parse_minutes(key, value)?;
            }
            "timer.long_break_interval" => {
                self.timer.long_break_interval = value
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| invalid_value(key, value, "a whole number of at least 1"))?;
            }
            "timer.sound_enabled" => {
                self.timer.sound_enabled = match value.to_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid_value(key, value, "true or false")),
                };
            }
            "timer.sound_volume" => {
                self.timer.sound_volume = value
                    .parse::<u8>()
                    .ok()
                    .filter(|n| *n <= 100)
                    .ok_or_else(|| invalid_value(key, value, "a number from 0 to 100"))?;
            }
            _ => return Err(FocusError::Config(format!("Unknown config key: {key}"))),
        }
        Ok(())
    }
}

/// Whole minutes from "25", "25m" or "1h30m".
fn parse_minutes(key: &str, value: &str) -> Result<u32, FocusError> {
    parse_duration(value)
        .filter(|d| d.num_seconds() % 60 == 0)
        .and_then(|d| u32::try_from(d.num_minutes()).ok())
        .filter(|n| (1..=24 * 60).contains(n))
        .ok_or_else(|| {
            FocusError::InvalidDuration(format!(
                "{key} = '{value}' (expected whole minutes between 1 and 1440)"
            ))
        })
}

fn invalid_value(key: &str, value: &str, expected: &str) -> FocusError {
    FocusError::Config(format!("Invalid value '{value}' for {key}: expected {expected}"))
}
