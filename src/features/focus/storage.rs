//! Focus session storage.
//!
//! Persists the session ledger to the local database.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::ledger::SessionLedger;
use super::session::{PomodoroSession, SessionId};
use super::timer::{FocusTimer, SessionSink};
use crate::config::TimerSettings;
use crate::error::FocusError;
use crate::storage::Database;

const SELECT_COLUMNS: &str =
    "SELECT id, completed_at, duration_seconds, was_completed, task_label FROM pomodoro_sessions";

/// Storage for recorded sessions.
pub struct FocusStorage {
    db: Database,
}

impl FocusStorage {
    /// Open storage at the default database location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn new() -> Result<Self, FocusError> {
        let db = Database::open()?;
        Ok(Self { db })
    }

    /// Create storage with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Insert a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including on a duplicate id.
    pub fn insert(&self, session: &PomodoroSession) -> Result<(), FocusError> {
        self.db
            .connection()
            .execute(
                r"INSERT INTO pomodoro_sessions
                  (id, completed_at, duration_seconds, was_completed, task_label)
                  VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    session.id.to_string(),
                    timestamp(session.completed_at),
                    session.duration_seconds,
                    session.was_completed,
                    session.task_label,
                ],
            )
            .map_err(|e| FocusError::Database(format!("Failed to insert session: {e}")))?;

        Ok(())
    }

    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: SessionId) -> Result<Option<PomodoroSession>, FocusError> {
        self.db
            .connection()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id.to_string()],
                row_to_session,
            )
            .optional()
            .map_err(|e| FocusError::Database(format!("Failed to query session: {e}")))
    }

    /// Get the most recent sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_recent(&self, limit: usize) -> Result<Vec<PomodoroSession>, FocusError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query(
            &format!("{SELECT_COLUMNS} ORDER BY completed_at DESC LIMIT ?1"),
            params![limit],
        )
    }

    /// Get sessions completed in `[start, end)`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PomodoroSession>, FocusError> {
        self.query(
            &format!(
                "{SELECT_COLUMNS} WHERE completed_at >= ?1 AND completed_at < ?2 ORDER BY completed_at ASC"
            ),
            params![timestamp(start), timestamp(end)],
        )
    }

    /// Get sessions completed on a local calendar day.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_on(&self, date: NaiveDate) -> Result<Vec<PomodoroSession>, FocusError> {
        let (start, end) = local_day_bounds(date);
        self.get_range(start, end)
    }

    /// Number of stored sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<usize, FocusError> {
        let count: i64 = self
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM pomodoro_sessions", [], |row| row.get(0))
            .map_err(|e| FocusError::Database(format!("Failed to count sessions: {e}")))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Delete every stored session. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear(&self) -> Result<usize, FocusError> {
        let removed = self
            .db
            .connection()
            .execute("DELETE FROM pomodoro_sessions", [])
            .map_err(|e| FocusError::Database(format!("Failed to delete sessions: {e}")))?;

        info!(removed, "cleared session history");
        Ok(removed)
    }

    /// Build a timer whose ledger holds today's stored sessions and whose
    /// completions are written back to this storage.
    ///
    /// # Errors
    ///
    /// Returns an error if today's sessions cannot be read.
    pub fn into_timer(self, settings: TimerSettings) -> Result<FocusTimer, FocusError> {
        let today = self.get_on(Local::now().date_naive())?;
        info!(sessions = today.len(), "loaded today's sessions");
        let ledger = SessionLedger::with_history(today);
        Ok(FocusTimer::with_ledger(settings, ledger).with_sink(Box::new(self)))
    }

    fn query(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<PomodoroSession>, FocusError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| FocusError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, row_to_session)
            .map_err(|e| FocusError::Database(format!("Failed to query sessions: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| FocusError::Database(e.to_string()))
    }
}

impl SessionSink for FocusStorage {
    fn record(&mut self, session: &PomodoroSession) -> Result<(), FocusError> {
        self.insert(session)?;
        info!(id = %session.id, task = %session.task_label, "session saved");
        Ok(())
    }
}

/// UTC bounds `[start, end)` of a local calendar day.
#[must_use]
pub fn local_day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_midnight(date);
    let end = date
        .succ_opt()
        .map_or_else(|| start + chrono::Duration::days(1), local_midnight);
    (start, end)
}

fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| naive.and_utc(), |t| t.with_timezone(&Utc))
}

/// Fixed-width UTC timestamp, so stored values sort as text.
fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Convert a database row to a session.
fn row_to_session(row: &Row<'_>) -> Result<PomodoroSession, rusqlite::Error> {
    let id: String = row.get(0)?;
    let completed_at: String = row.get(1)?;

    let id = SessionId::parse(&id).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("invalid session id: {id}").into(),
        )
    })?;

    let completed_at = DateTime::parse_from_rfc3339(&completed_at)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(PomodoroSession {
        id,
        completed_at,
        duration_seconds: row.get(2)?,
        was_completed: row.get(3)?,
        task_label: row.get(4)?,
    })
}
