//! SQLite-backed rating store.
//!
//! [`SqliteStore`] is the durable [`RatingStore`] implementation plus the
//! resume-specific persistence the HTTP server and the importer need
//! (creation, owner queries, rating history).
//!
//! Correctness under concurrent votes comes from the `version` column: every
//! match commit runs in one `BEGIN IMMEDIATE` transaction whose updates are
//! guarded with `WHERE id = ? AND version = ?`. A guard that matches no row
//! rolls the whole transaction back, so a lost race surfaces as
//! [`EngineError::Conflict`] and never as a partial write.

use chrono::{DateTime, Utc};
use rank_core::{EngineError, Pool, RatingStore, RatingUpdate, Versioned};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{HistoryPoint, Resume, ResumeProfile};

const RESUME_COLUMNS: &str = "id, owner_id, file_name, original_name, rating, wins, losses, created_at";

fn storage_err(err: rusqlite::Error) -> EngineError {
    EngineError::StorageUnavailable(err.to_string())
}

fn resume_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Resume> {
    Ok(Resume {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        file_name: row.get(2)?,
        original_name: row.get(3)?,
        rating: row.get(4)?,
        wins: row.get(5)?,
        losses: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Durable rating store over a shared SQLite connection.
#[derive(Clone)]
pub struct SqliteStore {
    db: DbPool,
}

impl SqliteStore {
    /// Create a store over the given connection handle.
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Register a newly uploaded (or seeded) resume.
    ///
    /// `owner_id` of `None` marks a system-seeded resume. The record starts
    /// at `initial_rating` with zero matches and an empty history.
    pub fn create(
        &self,
        owner_id: Option<&str>,
        file_name: &str,
        original_name: &str,
        initial_rating: i32,
    ) -> Result<Resume, EngineError> {
        let resume = Resume {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.map(String::from),
            file_name: file_name.to_string(),
            original_name: original_name.to_string(),
            rating: initial_rating,
            wins: 0,
            losses: 0,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = self.db.lock().unwrap();
        conn.execute(
            "INSERT INTO resumes (id, owner_id, file_name, original_name, rating, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                resume.id,
                resume.owner_id,
                resume.file_name,
                resume.original_name,
                resume.rating,
                resume.created_at,
            ],
        )
        .map_err(storage_err)?;

        Ok(resume)
    }

    /// Get a resume by id. Returns `None` if it doesn't exist.
    pub fn find(&self, id: &str) -> Result<Option<Resume>, EngineError> {
        let conn = self.db.lock().unwrap();
        conn.query_row(
            &format!("SELECT {RESUME_COLUMNS} FROM resumes WHERE id = ?1"),
            [id],
            resume_from_row,
        )
        .optional()
        .map_err(storage_err)
    }

    /// Get a resume by its stored file name (used for import dedup).
    pub fn find_by_file_name(&self, file_name: &str) -> Result<Option<Resume>, EngineError> {
        let conn = self.db.lock().unwrap();
        conn.query_row(
            &format!("SELECT {RESUME_COLUMNS} FROM resumes WHERE file_name = ?1"),
            [file_name],
            resume_from_row,
        )
        .optional()
        .map_err(storage_err)
    }

    /// All resumes submitted by one user, newest first.
    pub fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Resume>, EngineError> {
        let conn = self.db.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {RESUME_COLUMNS} FROM resumes
                 WHERE owner_id = ?1 ORDER BY created_at DESC, id DESC"
            ))
            .map_err(storage_err)?;

        let resumes = stmt
            .query_map([owner_id], resume_from_row)
            .map_err(storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;

        Ok(resumes)
    }

    /// Rating trajectory of a resume, oldest point first.
    pub fn history(&self, id: &str) -> Result<Vec<HistoryPoint>, EngineError> {
        let conn = self.db.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT rating, recorded_at FROM rating_history
                 WHERE resume_id = ?1 ORDER BY id ASC",
            )
            .map_err(storage_err)?;

        let history = stmt
            .query_map([id], |row| {
                Ok(HistoryPoint {
                    rating: row.get(0)?,
                    recorded_at: row.get(1)?,
                })
            })
            .map_err(storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;

        Ok(history)
    }

    /// Get a resume profile with its rating history.
    ///
    /// Returns `None` if the resume doesn't exist.
    pub fn profile(&self, id: &str) -> Result<Option<ResumeProfile>, EngineError> {
        let resume = match self.find(id)? {
            Some(resume) => resume,
            None => return Ok(None),
        };
        let rating_history = self.history(id)?;
        Ok(Some(ResumeProfile {
            resume,
            rating_history,
        }))
    }

    fn promoted_flag(pool: Pool) -> i64 {
        match pool {
            Pool::All => 0,
            Pool::Promoted => 1,
        }
    }
}

impl RatingStore for SqliteStore {
    type Item = Resume;

    fn get(&self, id: &str) -> Result<Option<Versioned<Resume>>, EngineError> {
        let conn = self.db.lock().unwrap();
        conn.query_row(
            &format!("SELECT {RESUME_COLUMNS}, version FROM resumes WHERE id = ?1"),
            [id],
            |row| {
                Ok(Versioned {
                    item: resume_from_row(row)?,
                    version: row.get::<_, i64>(8)? as u64,
                })
            },
        )
        .optional()
        .map_err(storage_err)
    }

    fn count(&self, pool: Pool, exclude: Option<&str>) -> Result<usize, EngineError> {
        let conn = self.db.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM resumes
                 WHERE (?1 = 0 OR owner_id IS NOT NULL)
                   AND (?2 IS NULL OR id <> ?2)",
                params![Self::promoted_flag(pool), exclude],
                |row| row.get(0),
            )
            .map_err(storage_err)?;
        Ok(count as usize)
    }

    fn nth(
        &self,
        pool: Pool,
        exclude: Option<&str>,
        index: usize,
    ) -> Result<Option<Resume>, EngineError> {
        let conn = self.db.lock().unwrap();
        conn.query_row(
            &format!(
                "SELECT {RESUME_COLUMNS} FROM resumes
                 WHERE (?1 = 0 OR owner_id IS NOT NULL)
                   AND (?2 IS NULL OR id <> ?2)
                 ORDER BY created_at ASC, id ASC
                 LIMIT 1 OFFSET ?3"
            ),
            params![Self::promoted_flag(pool), exclude, index as i64],
            resume_from_row,
        )
        .optional()
        .map_err(storage_err)
    }

    fn commit_match(
        &self,
        winner: RatingUpdate,
        loser: RatingUpdate,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        if winner.id == loser.id {
            return Err(EngineError::SelfMatch);
        }

        let conn = self.db.lock().unwrap();
        conn.execute_batch("BEGIN IMMEDIATE;").map_err(storage_err)?;

        let result = apply_match(&conn, &winner, &loser, recorded_at);
        match result {
            Ok(()) => {
                conn.execute_batch("COMMIT;").map_err(storage_err)?;
                Ok(())
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK;");
                Err(e)
            }
        }
    }

    fn top(&self, limit: usize, offset: usize) -> Result<Vec<Resume>, EngineError> {
        let conn = self.db.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {RESUME_COLUMNS} FROM resumes
                 ORDER BY rating DESC, created_at ASC, id ASC
                 LIMIT ?1 OFFSET ?2"
            ))
            .map_err(storage_err)?;

        let resumes = stmt
            .query_map(params![limit as i64, offset as i64], resume_from_row)
            .map_err(storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;

        Ok(resumes)
    }
}

/// Apply both sides of a match inside an already-open transaction.
fn apply_match(
    conn: &Connection,
    winner: &RatingUpdate,
    loser: &RatingUpdate,
    recorded_at: DateTime<Utc>,
) -> Result<(), EngineError> {
    apply_side(conn, winner, "wins")?;
    apply_side(conn, loser, "losses")?;

    let recorded_at = recorded_at.to_rfc3339();
    for side in [winner, loser] {
        conn.execute(
            "INSERT INTO rating_history (resume_id, rating, recorded_at)
             VALUES (?1, ?2, ?3)",
            params![side.id, side.new_rating, recorded_at],
        )
        .map_err(storage_err)?;
    }

    Ok(())
}

/// Version-guarded update of one side; `counter` is `wins` or `losses`.
fn apply_side(conn: &Connection, update: &RatingUpdate, counter: &str) -> Result<(), EngineError> {
    let changed = conn
        .execute(
            &format!(
                "UPDATE resumes
                 SET rating = ?1, {counter} = {counter} + 1, version = version + 1
                 WHERE id = ?2 AND version = ?3"
            ),
            params![update.new_rating, update.id, update.expected_version as i64],
        )
        .map_err(storage_err)?;

    if changed == 0 {
        // Distinguish a vanished row from a lost race.
        let version: Option<i64> = conn
            .query_row(
                "SELECT version FROM resumes WHERE id = ?1",
                [&update.id],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_err)?;
        return match version {
            None => Err(EngineError::ItemNotFound(update.id.clone())),
            Some(_) => Err(EngineError::Conflict),
        };
    }

    Ok(())
}
