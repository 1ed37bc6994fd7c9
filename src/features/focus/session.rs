//! Ledger entries for finished work phases.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label recorded when the user didn't name what they worked on.
pub const DEFAULT_TASK_LABEL: &str = "Focus Session";

/// Opaque identifier of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded Pomodoro session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSession {
    /// Unique identifier
    pub id: SessionId,
    /// When the session ended
    pub completed_at: DateTime<Utc>,
    /// Length of the session in seconds
    pub duration_seconds: u32,
    /// Whether the work phase ran to the end
    pub was_completed: bool,
    /// What the user was working on
    pub task_label: String,
}

impl PomodoroSession {
    /// Create an entry for a work phase that ran to the end just now.
    ///
    /// An empty label is replaced with [`DEFAULT_TASK_LABEL`].
    #[must_use]
    pub fn completed(duration_seconds: u32, task_label: &str) -> Self {
        Self::completed_at(Utc::now(), duration_seconds, task_label)
    }

    /// Create a completed entry with an explicit timestamp.
    #[must_use]
    pub fn completed_at(
        completed_at: DateTime<Utc>,
        duration_seconds: u32,
        task_label: &str,
    ) -> Self {
        let label = task_label.trim();
        Self {
            id: SessionId::new(),
            completed_at,
            duration_seconds,
            was_completed: true,
            task_label: if label.is_empty() {
                DEFAULT_TASK_LABEL.to_string()
            } else {
                label.to_string()
            },
        }
    }

    /// Completion time in the local timezone.
    #[must_use]
    pub fn completed_at_local(&self) -> DateTime<Local> {
        self.completed_at.with_timezone(&Local)
    }

    /// Check whether the session ended on `date` (local calendar day).
    #[must_use]
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.completed_at_local().date_naive() == date
    }
}
