//! The session ledger and statistics derived from it.
//!
//! The ledger is append-only. Statistics are recomputed from it on every
//! call instead of being cached.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::session::PomodoroSession;

/// Statistics for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    /// Local calendar day
    pub date: NaiveDate,
    /// Completed sessions that day
    pub completed_sessions: usize,
    /// Recorded focus seconds that day
    pub focus_seconds: u64,
    /// Work sessions per long break
    pub long_break_interval: u32,
    /// Work sessions left before the next long break, counted from that day's total
    pub sessions_until_long_break: u32,
}

/// Append-only list of recorded sessions, oldest first.
#[derive(Debug, Clone, Default)]
pub struct SessionLedger {
    entries: Vec<PomodoroSession>,
}

impl SessionLedger {
    /// Create an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a ledger seeded with previously recorded sessions.
    ///
    /// Sessions are ordered by completion time.
    #[must_use]
    pub fn with_history(mut entries: Vec<PomodoroSession>) -> Self {
        entries.sort_by_key(|s| s.completed_at);
        Self { entries }
    }

    /// Append a session.
    pub fn append(&mut self, session: PomodoroSession) {
        self.entries.push(session);
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[PomodoroSession] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `limit` most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &PomodoroSession> {
        self.entries.iter().rev().take(limit)
    }

    /// Entries that ended on `date` (local calendar day).
    pub fn sessions_on(&self, date: NaiveDate) -> impl Iterator<Item = &PomodoroSession> {
        self.entries.iter().filter(move |s| s.is_on(date))
    }

    /// Entries that ended today.
    #[must_use]
    pub fn todays_sessions(&self) -> Vec<&PomodoroSession> {
        self.sessions_on(today()).collect()
    }

    /// Count of completed entries on `date`.
    #[must_use]
    pub fn completed_count_on(&self, date: NaiveDate) -> usize {
        self.sessions_on(date).filter(|s| s.was_completed).count()
    }

    /// Count of completed entries today.
    #[must_use]
    pub fn todays_completed_count(&self) -> usize {
        self.completed_count_on(today())
    }

    /// Total recorded seconds on `date`.
    #[must_use]
    pub fn focus_seconds_on(&self, date: NaiveDate) -> u64 {
        self.sessions_on(date)
            .map(|s| u64::from(s.duration_seconds))
            .sum()
    }

    /// Total recorded seconds today.
    #[must_use]
    pub fn todays_focus_seconds(&self) -> u64 {
        self.focus_seconds_on(today())
    }

    /// Summarize `date`, with the long break cycle of `interval` sessions.
    #[must_use]
    pub fn summary_on(&self, date: NaiveDate, interval: u32) -> DailySummary {
        let interval = interval.max(1);
        let completed = self.completed_count_on(date);
        let done = u32::try_from(completed).unwrap_or(u32::MAX);
        let sessions_until_long_break = interval - done % interval;

        DailySummary {
            date,
            completed_sessions: completed,
            focus_seconds: self.focus_seconds_on(date),
            long_break_interval: interval,
            sessions_until_long_break,
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fraction of `duration` already elapsed, clamped to `[0, 1]`.
#[must_use]
pub fn progress_fraction(duration: u32, remaining: u32) -> f64 {
    if duration == 0 {
        return 1.0;
    }
    let elapsed = f64::from(duration.saturating_sub(remaining));
    (elapsed / f64::from(duration)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session_days_ago(days: i64, seconds: u32) -> PomodoroSession {
        PomodoroSession::completed_at(Utc::now() - Duration::days(days), seconds, "test")
    }

    #[test]
    fn test_append_and_recent() {
        let mut ledger = SessionLedger::new();
        assert!(ledger.is_empty());

        for i in 0..5 {
            ledger.append(PomodoroSession::completed(60, &format!("task {i}")));
        }

        assert_eq!(ledger.len(), 5);
        let recent: Vec<_> = ledger.recent(2).map(|s| s.task_label.as_str()).collect();
        assert_eq!(recent, ["task 4", "task 3"]);
    }

    #[test]
    fn test_with_history_sorts() {
        let ledger =
            SessionLedger::with_history(vec![session_days_ago(0, 60), session_days_ago(3, 60)]);
        assert!(ledger.entries()[0].completed_at < ledger.entries()[1].completed_at);
    }

    #[test]
    fn test_todays_focus_seconds_ignores_yesterday() {
        let mut ledger = SessionLedger::new();
        ledger.append(session_days_ago(0, 1500));
        ledger.append(session_days_ago(0, 1500));
        assert_eq!(ledger.todays_focus_seconds(), 3000);

        ledger.append(session_days_ago(1, 1500));
        assert_eq!(ledger.todays_focus_seconds(), 3000);
        assert_eq!(ledger.todays_sessions().len(), 2);
    }

    #[test]
    fn test_todays_completed_count_skips_unfinished() {
        let mut ledger = SessionLedger::new();
        ledger.append(session_days_ago(0, 1500));
        let mut partial = session_days_ago(0, 600);
        partial.was_completed = false;
        ledger.append(partial);

        assert_eq!(ledger.todays_completed_count(), 1);
        assert_eq!(ledger.todays_focus_seconds(), 2100);
    }

    #[test]
    fn test_stats_on_explicit_date() {
        let mut ledger = SessionLedger::new();
        ledger.append(session_days_ago(2, 300));
        ledger.append(session_days_ago(2, 300));
        ledger.append(session_days_ago(0, 300));

        let two_days_ago = ledger.entries()[0].completed_at_local().date_naive();
        assert_eq!(ledger.completed_count_on(two_days_ago), 2);
        assert_eq!(ledger.focus_seconds_on(two_days_ago), 600);
    }

    #[test]
    fn test_summary_on_counts_down_to_long_break() {
        let mut ledger = SessionLedger::new();
        let today = today();
        assert_eq!(ledger.summary_on(today, 4).sessions_until_long_break, 4);

        ledger.append(session_days_ago(0, 1500));
        let summary = ledger.summary_on(today, 4);
        assert_eq!(summary.completed_sessions, 1);
        assert_eq!(summary.focus_seconds, 1500);
        assert_eq!(summary.sessions_until_long_break, 3);

        for _ in 0..3 {
            ledger.append(session_days_ago(0, 1500));
        }
        assert_eq!(ledger.summary_on(today, 4).sessions_until_long_break, 4);
    }

    #[test]
    fn test_progress_fraction() {
        assert!((progress_fraction(100, 100) - 0.0).abs() < f64::EPSILON);
        assert!((progress_fraction(100, 50) - 0.5).abs() < f64::EPSILON);
        assert!((progress_fraction(100, 0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_fraction_clamps() {
        assert!((progress_fraction(100, 150) - 0.0).abs() < f64::EPSILON);
        assert!((progress_fraction(0, 0) - 1.0).abs() < f64::EPSILON);
    }
}
