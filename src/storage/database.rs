//! The session database.
//!
//! One file, `~/.focusdeck/focusdeck.db`. A headless `run` appends to it
//! while `status` or `history` may be reading it from another process, so
//! file databases use WAL and wait on a locked writer instead of failing.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::config::Paths;
use crate::error::FocusError;

use super::migrations;

/// How long a statement waits on another process's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// An open, migrated session database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open `focusdeck.db` under the user's focusdeck directory, creating it
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, the file or the schema can't be set up.
    pub fn open() -> Result<Self, FocusError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the session database stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, FocusError> {
        let conn = Connection::open(path).map_err(|e| {
            FocusError::Database(format!("cannot open {}: {e}", path.display()))
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;

        tracing::debug!(path = %path.display(), journal = %mode, "session database opened");
        Self::migrated(conn)
    }

    /// A throwaway database with the current schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema can't be created.
    pub fn open_in_memory() -> Result<Self, FocusError> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(conn: Connection) -> Result<Self, FocusError> {
        migrations::run(&conn)?;
        Ok(Self { conn })
    }

    /// Schema version recorded in `PRAGMA user_version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma can't be read.
    pub fn schema_version(&self) -> Result<i32, FocusError> {
        migrations::get_version(&self.conn)
    }

    /// The underlying connection, for the session queries.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
