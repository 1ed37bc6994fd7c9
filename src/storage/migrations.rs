//! Database migrations for focusdeck.
//!
//! Each migration upgrades the schema by one version and is run
//! automatically when the database is opened.

use rusqlite::Connection;

use crate::error::FocusError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 for a new database.
pub fn get_version(conn: &Connection) -> Result<i32, FocusError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| FocusError::Database(format!("Failed to get schema version: {e}")))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), FocusError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| FocusError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), FocusError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
        tracing::info!(version, "applied database migration");
    }

    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> Result<(), FocusError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(FocusError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: the session ledger.
fn migrate_v1(conn: &Connection) -> Result<(), FocusError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS pomodoro_sessions (
            id TEXT PRIMARY KEY,
            completed_at TEXT NOT NULL,
            duration_seconds INTEGER NOT NULL,
            was_completed INTEGER NOT NULL DEFAULT 1,
            task_label TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pomodoro_sessions_completed
        ON pomodoro_sessions(completed_at);
        ",
    )
    .map_err(|e| FocusError::Database(format!("Migration v1 failed: {e}")))
}
