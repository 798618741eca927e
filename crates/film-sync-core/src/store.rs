//! SQLite persistence for stored films.
//!
//! Rows are insert-once: the orchestrator checks [`FilmStore::exists`] first,
//! and the primary key on `source_id` rejects anything that slips past it.

use chrono::{DateTime, SecondsFormat, Utc};
use film_sync_models::{CollectionStats, Film};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use crate::error::StoreError;
use crate::stats;

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

pub(crate) const FILM_COLUMNS: &str = "source_id, title, release_year, source_url, user_rating, public_rating,
     runtime_minutes, added_at, poster_url, director, cast_members, writers";

/// The slice of the store a sync run writes through.
pub trait FilmRepository: Send + Sync {
    fn exists(&self, source_id: &str) -> Result<bool, StoreError>;

    /// Persist a newly scraped film, stamping `added_at` with the current time.
    fn insert(&self, film: &Film) -> Result<(), StoreError>;
}

/// Shared handle to the film database. Cheap to share behind an `Arc`.
pub struct FilmStore {
    conn: Mutex<Connection>,
}

impl FilmStore {
    /// Open or create the database at `path`, creating its directory if needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let version = schema_version(&conn)?;
        if version == 0 {
            create_schema(&conn)?;
        } else if version > CURRENT_VERSION {
            return Err(StoreError::SchemaVersion {
                expected: CURRENT_VERSION,
                found: version,
            });
        }

        debug!(path = %path.display(), version = CURRENT_VERSION, "Opened film database");
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// In-memory database with the full schema. Useful for testing.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn exists(&self, source_id: &str) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM films WHERE source_id = ?1",
                params![source_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Persist `film`, stamping `added_at` with the current time.
    pub fn insert(&self, film: &Film) -> Result<(), StoreError> {
        self.insert_at(film, Utc::now())
    }

    /// Persist `film` with an explicit `added_at`. Any `added_at` already on the film is ignored.
    pub fn insert_at(&self, film: &Film, added_at: DateTime<Utc>) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let result = conn.execute(
            "INSERT INTO films (source_id, title, release_year, source_url, user_rating, public_rating,
                                runtime_minutes, added_at, poster_url, director, cast_members, writers)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                film.source_id,
                film.title,
                film.release_year,
                film.source_url,
                film.user_rating,
                film.public_rating,
                film.runtime_minutes,
                format_timestamp(added_at),
                film.poster_url,
                film.director,
                film.cast,
                film.writers,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::ConstraintViolation {
                    source_id: film.source_id.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Every stored film, most recently added first.
    pub fn list_all(&self) -> Result<Vec<Film>, StoreError> {
        self.query_films(
            &format!("SELECT {} FROM films ORDER BY added_at DESC, rowid DESC", FILM_COLUMNS),
            params![],
        )
    }

    /// Films rated at least `min`, highest rated first.
    pub fn filter_by_rating(&self, min: f64) -> Result<Vec<Film>, StoreError> {
        self.query_films(
            &format!(
                "SELECT {} FROM films WHERE user_rating >= ?1
                 ORDER BY user_rating DESC, added_at DESC, rowid DESC",
                FILM_COLUMNS
            ),
            params![min],
        )
    }

    /// Films released in `year`, most recently added first.
    pub fn filter_by_year(&self, year: u32) -> Result<Vec<Film>, StoreError> {
        self.query_films(
            &format!(
                "SELECT {} FROM films WHERE release_year = ?1 ORDER BY added_at DESC, rowid DESC",
                FILM_COLUMNS
            ),
            params![year],
        )
    }

    /// Case-insensitive substring match on title, ordered by title.
    ///
    /// `%` and `_` in `query` are passed through as LIKE wildcards.
    pub fn search_by_title(&self, query: &str) -> Result<Vec<Film>, StoreError> {
        let pattern = format!("%{}%", query);
        self.query_films(
            &format!(
                "SELECT {} FROM films WHERE title LIKE ?1 ORDER BY title ASC, rowid ASC",
                FILM_COLUMNS
            ),
            params![pattern],
        )
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM films", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    pub fn stats(&self) -> Result<CollectionStats, StoreError> {
        let conn = self.conn()?;
        stats::collect(&conn)
    }

    /// Delete every stored film. Returns the number of rows removed.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM films", [])?;
        info!(removed, "Cleared film database");
        Ok(removed)
    }

    fn query_films(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Film>, StoreError> {
        let conn = self.conn()?;
        query_films(&conn, sql, params)
    }
}

impl FilmRepository for FilmStore {
    fn exists(&self, source_id: &str) -> Result<bool, StoreError> {
        FilmStore::exists(self, source_id)
    }

    fn insert(&self, film: &Film) -> Result<(), StoreError> {
        FilmStore::insert(self, film)
    }
}

pub(crate) fn query_films(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Film>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, row_to_film)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_film(row: &Row<'_>) -> rusqlite::Result<Film> {
    let added_at: Option<String> = row.get(7)?;
    let added_at = added_at
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))
        })
        .transpose()?;

    Ok(Film {
        source_id: row.get(0)?,
        title: row.get(1)?,
        release_year: row.get::<_, Option<u32>>(2)?.unwrap_or(0),
        source_url: row.get(3)?,
        user_rating: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
        public_rating: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
        runtime_minutes: row.get::<_, Option<u32>>(6)?.unwrap_or(0),
        added_at,
        poster_url: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        director: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        cast: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        writers: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
    })
}

/// Fixed-width UTC so lexical order in SQL matches time order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [CURRENT_VERSION],
    )?;
    Ok(())
}

/// 0 when no schema exists yet.
fn schema_version(conn: &Connection) -> Result<i32, StoreError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS films (
    source_id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    release_year INTEGER,
    source_url TEXT NOT NULL,
    user_rating REAL,
    public_rating REAL,
    runtime_minutes INTEGER,
    added_at TEXT,
    poster_url TEXT,
    director TEXT,
    cast_members TEXT,
    writers TEXT
);

CREATE INDEX IF NOT EXISTS idx_films_title ON films(title);
CREATE INDEX IF NOT EXISTS idx_films_release_year ON films(release_year);
CREATE INDEX IF NOT EXISTS idx_films_user_rating ON films(user_rating);
"#;

#[cfg(test)]
mod tests;
