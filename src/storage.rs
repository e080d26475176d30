//! Local persistence for beaches, members, and research reports.
//!
//! Everything lives in one `SQLite` file:
//!
//! ```text
//! ~/.tideline/tideline.sqlite
//!   beach              # Surveyed locations, keyed by name
//!   member             # Workers and admins, keyed by username
//!   research           # One row per report
//!   research_segment   # Segments, ordered by position
//!   research_image     # Uploaded file names, ordered by position
//! ```
//!
//! All reads and writes go through a [`Tx`]. Dropping a `Tx` without
//! calling [`Tx::commit`] rolls it back.

mod beach;
mod member;
mod research;

use std::{fs, io, path::PathBuf};

use rusqlite::{Connection, Transaction, TransactionBehavior};
use uuid::Uuid;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("report not found: {0}")]
    ReportNotFound(Uuid),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt data: {0}")]
    Corrupt(String),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS beach (
        name      TEXT PRIMARY KEY,
        region    TEXT,
        latitude  REAL,
        longitude REAL
    );

    CREATE TABLE IF NOT EXISTS member (
        username TEXT PRIMARY KEY,
        name     TEXT NOT NULL,
        role     TEXT NOT NULL CHECK (role IN ('worker', 'admin')),
        contact  TEXT
    );

    CREATE TABLE IF NOT EXISTS research (
        id                    TEXT PRIMARY KEY,
        researcher            TEXT NOT NULL REFERENCES member(username),
        beach                 TEXT NOT NULL REFERENCES beach(name),
        beach_length          REAL,
        total_length          REAL NOT NULL,
        expected_trash_amount INTEGER NOT NULL,
        reported_at           TEXT NOT NULL,
        weather               TEXT NOT NULL,
        special_note          TEXT NOT NULL,
        status                TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS research_status_reported_at
        ON research (status, reported_at);

    CREATE TABLE IF NOT EXISTS research_segment (
        research_id           TEXT NOT NULL REFERENCES research(id) ON DELETE CASCADE,
        position              INTEGER NOT NULL,
        beach_name_with_index TEXT NOT NULL,
        start_lat             REAL NOT NULL,
        start_lon             REAL NOT NULL,
        end_lat               REAL NOT NULL,
        end_lon               REAL NOT NULL,
        main_trash_type       TEXT NOT NULL,
        length                REAL NOT NULL,
        PRIMARY KEY (research_id, position)
    );

    CREATE TABLE IF NOT EXISTS research_image (
        research_id TEXT NOT NULL REFERENCES research(id) ON DELETE CASCADE,
        position    INTEGER NOT NULL,
        file_name   TEXT NOT NULL,
        PRIMARY KEY (research_id, position)
    );
";

/// Local `SQLite`-backed storage.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the database at `path` and applies the schema.
    ///
    /// The parent directory is created if it doesn't exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(path = %path.display(), "opened storage");
        Ok(Self { conn })
    }

    /// Returns the default database path: `~/.tideline/tideline.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tideline").join("tideline.sqlite"))
    }

    /// Begins a write transaction.
    ///
    /// Takes the database write lock up front (`BEGIN IMMEDIATE`), so two
    /// writers never interleave a read-check-write sequence.
    pub fn transaction(&self) -> Result<Tx<'_>> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        Ok(Tx { tx })
    }

    /// Begins a read-only unit of work.
    pub fn read(&self) -> Result<Tx<'_>> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Deferred)?;
        Ok(Tx { tx })
    }
}

/// An open transaction. Lookups and writes are defined per table in the
/// `storage::*` submodules.
pub struct Tx<'a> {
    tx: Transaction<'a>,
}

impl Tx<'_> {
    /// Commits every write made through this transaction.
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

/// True when `err` is a primary-key or uniqueness violation.
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Escapes `%`, `_` and `\` so `s` matches literally inside a `LIKE ... ESCAPE '\'`.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use super::Storage;
    use crate::model::{Beach, Coordinate, Member, Worker};

    pub fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("tideline.sqlite")).unwrap();
        (dir, storage)
    }

    pub fn sample_worker() -> Worker {
        Worker {
            username: "minji".into(),
            name: "Kim Minji".into(),
            contact: Some("010-1234-5678".into()),
        }
    }

    pub fn sample_beach() -> Beach {
        Beach {
            name: "Haeundae".into(),
            region: Some("Busan Haeundae-gu".into()),
            center: Some(Coordinate::new(35.1587, 129.1604)),
        }
    }

    /// Storage with `sample_worker` and `sample_beach` registered.
    pub fn seeded_storage() -> (TempDir, Storage) {
        let (dir, storage) = test_storage();
        let tx = storage.transaction().unwrap();
        tx.insert_member(&Member::Worker(sample_worker())).unwrap();
        tx.insert_beach(&sample_beach()).unwrap();
        tx.commit().unwrap();
        (dir, storage)
    }
}
