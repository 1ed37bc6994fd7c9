//! Timer phases.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FocusError;

/// Phase of the Pomodoro cycle.
///
/// The phase selects which configured duration applies and which
/// completion rule fires when the countdown expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Focused work
    Work,
    /// Short break between work phases
    ShortBreak,
    /// Long break after a full cycle of work phases
    LongBreak,
}

impl TimerPhase {
    /// All phases, in display order.
    pub const ALL: [Self; 3] = [Self::Work, Self::ShortBreak, Self::LongBreak];

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Work => "Focus Time",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    /// Short label used in tables and tabs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::ShortBreak => "Short",
            Self::LongBreak => "Long",
        }
    }

    /// Check if this is a break phase.
    #[must_use]
    pub const fn is_break(&self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for TimerPhase {
    type Err = FocusError;

    /// Parse a phase name given on the command line or in a config file.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "work" | "focus" | "pomodoro" | "w" => Ok(Self::Work),
            "short" | "short-break" | "short_break" | "sb" | "s" => Ok(Self::ShortBreak),
            "long" | "long-break" | "long_break" | "lb" | "l" => Ok(Self::LongBreak),
            _ => Err(FocusError::InvalidPhase(s.to_string())),
        }
    }
}
