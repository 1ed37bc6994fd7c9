//! Focus session reports.
//!
//! Summarizes session history over a period.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::session::PomodoroSession;
use super::storage::{local_day_bounds, FocusStorage};
use super::timer::format_duration;
use crate::error::FocusError;

/// Report time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Today only
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// All time
    AllTime,
}

impl ReportPeriod {
    /// First local day covered by this period ending `today`.
    #[must_use]
    pub fn first_day(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Today => Some(today),
            Self::Week => Some(today - Duration::days(6)),
            Self::Month => Some(today - Duration::days(29)),
            Self::AllTime => None,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "Last 7 Days",
            Self::Month => "Last 30 Days",
            Self::AllTime => "All Time",
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = FocusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" | "t" | "d" => Ok(Self::Today),
            "week" | "w" | "7d" => Ok(Self::Week),
            "month" | "m" | "30d" => Ok(Self::Month),
            "all" | "alltime" | "all-time" => Ok(Self::AllTime),
            _ => Err(FocusError::Parse(format!(
                "Unknown report period '{s}' (expected today, week, month or all)"
            ))),
        }
    }
}

/// Focus report data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusReport {
    /// Report period name
    pub period: String,
    /// Total recorded focus time in seconds
    pub total_seconds: u64,
    /// Number of completed sessions
    pub completed_sessions: usize,
    /// Average session length in seconds
    pub avg_session_seconds: u64,
    /// Longest session in seconds
    pub longest_session_seconds: u32,
    /// Focus seconds by day of week, Monday first
    pub by_day_of_week: [u64; 7],
    /// Focus time by task, largest first
    pub by_task: Vec<TaskFocusTime>,
    /// Daily breakdown, newest first
    pub daily: Vec<DailyFocusTime>,
    /// Consecutive days with at least one session, ending today or yesterday
    pub streak_days: u32,
}

/// Focus time per task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskFocusTime {
    /// Task label
    pub task_label: String,
    /// Total focus seconds
    pub seconds: u64,
    /// Session count
    pub sessions: usize,
}

/// Focus time per day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyFocusTime {
    /// Date
    pub date: NaiveDate,
    /// Total focus seconds
    pub seconds: u64,
    /// Session count
    pub sessions: usize,
}

impl FocusReport {
    /// Generate a report for the given period from stored history.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions cannot be read.
    pub fn generate(storage: &FocusStorage, period: ReportPeriod) -> Result<Self, FocusError> {
        let today = Local::now().date_naive();
        let (_, end) = local_day_bounds(today);
        let sessions = match period.first_day(today) {
            Some(first) => storage.get_range(local_day_bounds(first).0, end)?,
            None => storage.get_recent(usize::MAX)?,
        };
        Ok(Self::from_sessions(period, &sessions, today))
    }

    /// Build a report from sessions already loaded.
    ///
    /// Sessions outside the period are ignored.
    #[must_use]
    pub fn from_sessions(period: ReportPeriod, sessions: &[PomodoroSession], today: NaiveDate) -> Self {
        let first = period.first_day(today);
        let completed: Vec<(&PomodoroSession, NaiveDate)> = sessions
            .iter()
            .filter(|s| s.was_completed)
            .map(|s| (s, s.completed_at_local().date_naive()))
            .filter(|(_, date)| *date <= today && first.map_or(true, |f| *date >= f))
            .collect();

        let total_seconds: u64 = completed
            .iter()
            .map(|(s, _)| u64::from(s.duration_seconds))
            .sum();
        let completed_sessions = completed.len();
        let avg_session_seconds = if completed_sessions > 0 {
            total_seconds / completed_sessions as u64
        } else {
            0
        };
        let longest_session_seconds = completed
            .iter()
            .map(|(s, _)| s.duration_seconds)
            .max()
            .unwrap_or(0);

        let mut by_day_of_week = [0u64; 7];
        for (session, date) in &completed {
            let weekday = date.weekday().num_days_from_monday() as usize;
            by_day_of_week[weekday] += u64::from(session.duration_seconds);
        }

        let mut task_map: HashMap<&str, (u64, usize)> = HashMap::new();
        for (session, _) in &completed {
            let entry = task_map.entry(session.task_label.as_str()).or_default();
            entry.0 += u64::from(session.duration_seconds);
            entry.1 += 1;
        }
        let mut by_task: Vec<TaskFocusTime> = task_map
            .into_iter()
            .map(|(task_label, (seconds, sessions))| TaskFocusTime {
                task_label: task_label.to_string(),
                seconds,
                sessions,
            })
            .collect();
        by_task.sort_by(|a, b| {
            b.seconds
                .cmp(&a.seconds)
                .then_with(|| a.task_label.cmp(&b.task_label))
        });

        let mut daily_map: BTreeMap<NaiveDate, (u64, usize)> = BTreeMap::new();
        for (session, date) in &completed {
            let entry = daily_map.entry(*date).or_default();
            entry.0 += u64::from(session.duration_seconds);
            entry.1 += 1;
        }
        let streak_days = calculate_streak(daily_map.keys().copied(), today);
        let daily: Vec<DailyFocusTime> = daily_map
            .into_iter()
            .rev()
            .map(|(date, (seconds, sessions))| DailyFocusTime {
                date,
                seconds,
                sessions,
            })
            .collect();

        Self {
            period: period.display_name().to_string(),
            total_seconds,
            completed_sessions,
            avg_session_seconds,
            longest_session_seconds,
            by_day_of_week,
            by_task,
            daily,
            streak_days,
        }
    }

    /// Format the report for display.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("📊 Focus Report: {}", self.period));
        lines.push("═".repeat(50));
        lines.push(String::new());

        lines.push("Summary".to_string());
        lines.push("─".repeat(40));
        lines.push(format!(
            "  Total focus time:    {}",
            format_duration(seconds(self.total_seconds))
        ));
        lines.push(format!("  Completed sessions:  {}", self.completed_sessions));
        lines.push(format!(
            "  Average session:     {}",
            format_duration(seconds(self.avg_session_seconds))
        ));
        lines.push(format!(
            "  Longest session:     {}",
            format_duration(seconds(u64::from(self.longest_session_seconds)))
        ));
        lines.push(format!("  Current streak:      {} days", self.streak_days));
        lines.push(String::new());

        if self.total_seconds > 0 {
            lines.push("By Day of Week".to_string());
            lines.push("─".repeat(40));
            let days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
            let max_day = self.by_day_of_week.iter().max().copied().unwrap_or(1).max(1);

            for (day, total) in days.iter().zip(self.by_day_of_week) {
                let bar_len = (total as f64 / max_day as f64 * 20.0) as usize;
                lines.push(format!("  {} {:>4}m {}", day, total / 60, "█".repeat(bar_len)));
            }
            lines.push(String::new());
        }

        if !self.by_task.is_empty() {
            lines.push("Top Tasks".to_string());
            lines.push("─".repeat(40));

            for task in self.by_task.iter().take(5) {
                lines.push(format!(
                    "  {:<25} {:>4}m ({} sessions)",
                    truncate(&task.task_label, 25),
                    task.seconds / 60,
                    task.sessions
                ));
            }
            lines.push(String::new());
        }

        if !self.daily.is_empty() {
            lines.push("Recent Days".to_string());
            lines.push("─".repeat(40));

            for day in self.daily.iter().take(7) {
                lines.push(format!(
                    "  {} {:>4}m ({} sessions)",
                    day.date,
                    day.seconds / 60,
                    day.sessions
                ));
            }
        }

        lines.join("\n")
    }

    /// Get total hours.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_hours(&self) -> f64 {
        self.total_seconds as f64 / 3600.0
    }
}

fn seconds(s: u64) -> Duration {
    Duration::seconds(i64::try_from(s).unwrap_or(i64::MAX))
}

/// Shorten `s` to at most `max` characters, marking the cut with "...".
#[must_use]
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Count consecutive days with sessions, backwards from today.
///
/// A day without sessions yet doesn't break the streak until it's over,
/// so counting starts from yesterday when today is empty.
fn calculate_streak(dates: impl Iterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let dates: std::collections::BTreeSet<NaiveDate> = dates.collect();

    let mut check_date = today;
    if !dates.contains(&today) {
        check_date = today - Duration::days(1);
    }

    let mut streak = 0;
    while dates.contains(&check_date) {
        streak += 1;
        check_date -= Duration::days(1);
    }

    streak
}
