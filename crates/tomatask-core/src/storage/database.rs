//! SQLite storage.
//!
//! Provides persistent storage for:
//! - Per-user pomodoro settings
//! - Per-user task records (see `tasks.rs`)

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::identity::UserId;
use crate::settings::{PomodoroSettings, SettingsStore};

/// SQLite database for settings and tasks.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/tomatask/tomatask.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("tomatask.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS pomodoro_settings (
                user_id                    TEXT PRIMARY KEY,
                work_duration              INTEGER NOT NULL,
                short_break_duration       INTEGER NOT NULL,
                long_break_duration        INTEGER NOT NULL,
                sessions_before_long_break INTEGER NOT NULL,
                alarm_volume               INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS todos (
                id           TEXT PRIMARY KEY,
                user_id      TEXT NOT NULL,
                text         TEXT NOT NULL,
                completed    INTEGER NOT NULL DEFAULT 0,
                created_at   TEXT NOT NULL,
                sort_order   INTEGER,
                completed_at TEXT,
                hidden       INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_todos_user_id ON todos(user_id);",
        )?;
        Ok(())
    }
}

impl SettingsStore for Database {
    fn get(&self, user: &UserId) -> Result<Option<PomodoroSettings>> {
        let row = self
            .conn
            .query_row(
                "SELECT work_duration, short_break_duration, long_break_duration,
                        sessions_before_long_break, alarm_volume
                 FROM pomodoro_settings WHERE user_id = ?1",
                params![user.as_str()],
                |row| {
                    Ok(PomodoroSettings {
                        work_duration: row.get(0)?,
                        short_break_duration: row.get(1)?,
                        long_break_duration: row.get(2)?,
                        sessions_before_long_break: row.get(3)?,
                        alarm_volume: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn put(&self, user: &UserId, settings: &PomodoroSettings) -> Result<()> {
        self.conn.execute(
            "INSERT INTO pomodoro_settings (user_id, work_duration, short_break_duration,
                 long_break_duration, sessions_before_long_break, alarm_volume)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id) DO UPDATE SET
                 work_duration = excluded.work_duration,
                 short_break_duration = excluded.short_break_duration,
                 long_break_duration = excluded.long_break_duration,
                 sessions_before_long_break = excluded.sessions_before_long_break,
                 alarm_volume = excluded.alarm_volume",
            params![
                user.as_str(),
                settings.work_duration,
                settings.short_break_duration,
                settings.long_break_duration,
                settings.sessions_before_long_break,
                settings.alarm_volume,
            ],
        )?;
        Ok(())
    }
}
