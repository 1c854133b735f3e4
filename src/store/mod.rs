//! Durable storage: SQLite catalog tables plus the uploads directory.
//!
//! ## On-disk layout
//!
//! ```text
//! {data_dir}/
//! ├── cartable.db      five tables, see `init_schema`
//! └── uploads/
//!     └── {token}_{original file name}
//! ```
//!
//! Connections are opened through [`open_conn`], which applies the shared
//! pragmas. The schema is versioned via `PRAGMA user_version`; increment
//! [`SCHEMA_VERSION`] when the DDL changes and add a migration path in
//! [`init_schema`].

pub mod catalog;
pub mod documents;

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;

use crate::error::AppError;

/// Schema version stored in `PRAGMA user_version`.
pub(crate) const SCHEMA_VERSION: i64 = 1;

/// Open a SQLite connection to `db_path` and apply the shared pragmas.
///
/// Pragmas applied:
/// - `journal_mode = WAL`, allows concurrent readers alongside a writer.
/// - `busy_timeout = 5000`, wait up to 5 s before returning `SQLITE_BUSY`.
///
/// `foreign_keys` stays off: the admin API tolerates orphan rows, and
/// deletes must neither cascade nor be refused.
pub fn open_conn(db_path: &Path) -> Result<Connection, AppError> {
    let conn = Connection::open(db_path)
        .map_err(|e| AppError::Storage(format!("open {}: {e}", db_path.display())))?;

    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| AppError::Storage(format!("set journal_mode WAL: {e}")))?;
    conn.pragma_update(None, "busy_timeout", 5000)
        .map_err(|e| AppError::Storage(format!("set busy_timeout: {e}")))?;
    conn.pragma_update(None, "foreign_keys", "OFF")
        .map_err(|e| AppError::Storage(format!("set foreign_keys OFF: {e}")))?;

    Ok(conn)
}

/// Execute the v1 schema DDL on a freshly-opened connection, or verify the
/// stored version on re-open.
///
/// The foreign-key clauses document the hierarchy but are not enforced
/// (see [`open_conn`]). Timestamps are RFC 3339 strings written by the
/// stores at insert time, so lexicographic order is chronological order.
pub fn init_schema(conn: &Connection) -> Result<(), AppError> {
    let version: i64 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(|e| AppError::Storage(format!("read schema version: {e}")))?;

    if version == 0 {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS levels (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                name_ar TEXT NOT NULL,
                color TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS years (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                level_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                name_ar TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (level_id) REFERENCES levels(id)
            );

            CREATE TABLE IF NOT EXISTS subjects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                year_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                name_ar TEXT NOT NULL,
                icon TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                FOREIGN KEY (year_id) REFERENCES years(id)
            );

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                name_ar TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                file_name TEXT NOT NULL,
                file_path TEXT NOT NULL,
                file_size INTEGER NOT NULL DEFAULT 0,
                downloads INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY (subject_id) REFERENCES subjects(id),
                FOREIGN KEY (category_id) REFERENCES categories(id)
            );

            PRAGMA user_version = 1;
            ",
        )
        .map_err(|e| AppError::Storage(format!("initialize schema: {e}")))?;
        return Ok(());
    }

    if version != SCHEMA_VERSION {
        return Err(AppError::Storage(format!(
            "unsupported schema version {version}, expected {SCHEMA_VERSION}"
        )));
    }

    Ok(())
}

/// Current UTC time as an RFC 3339 string with second precision, e.g.
/// `"2025-04-01T12:00:00Z"`. Used for all `created_at` columns.
pub(crate) fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
