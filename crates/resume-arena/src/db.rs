//! Database module for the resume arena.

use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Thread-safe database connection handle.
pub type DbPool = Arc<Mutex<Connection>>;

/// Initialize database with schema.
///
/// Creates the tables used by the arena:
/// - `resumes`: one row per comparable item, including its rating state and
///   the optimistic-concurrency `version` column guarding every update
/// - `rating_history`: append-only rating trajectory, one row per resolved
///   match an item participated in
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file (use `:memory:` for in-memory)
///
/// # Errors
///
/// Returns an error if the database cannot be opened or schema creation fails.
pub fn init_db<P: AsRef<Path>>(path: P) -> SqliteResult<DbPool> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS resumes (
            id TEXT PRIMARY KEY,
            owner_id TEXT,
            file_name TEXT NOT NULL,
            original_name TEXT NOT NULL,
            rating INTEGER NOT NULL DEFAULT 1200,
            wins INTEGER NOT NULL DEFAULT 0,
            losses INTEGER NOT NULL DEFAULT 0,
            version INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_resumes_rating
            ON resumes(rating DESC, created_at ASC);
        CREATE INDEX IF NOT EXISTS idx_resumes_owner ON resumes(owner_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_resumes_file_name
            ON resumes(file_name);

        CREATE TABLE IF NOT EXISTS rating_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            resume_id TEXT NOT NULL REFERENCES resumes(id),
            rating INTEGER NOT NULL,
            recorded_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_rating_history_resume
            ON rating_history(resume_id);
        ",
    )?;

    Ok(Arc::new(Mutex::new(conn)))
}
