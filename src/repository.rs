//! Repository facade: the read/write contract the API layer consumes.
//!
//! A [`Repository`] owns the storage connection for its whole lifetime.
//! [`Repository::open`] creates the data directory, applies the schema and
//! runs the bootstrap seeder; dropping the repository releases the
//! connection. Every method delegates to the catalog or document store,
//! passing the connection explicitly.
//!
//! All operations are synchronous and may block on disk or on the storage
//! engine; there are no internal timeouts beyond the connection's busy
//! timeout, and nothing is retried here.

use std::fs;

use rusqlite::Connection;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::seed;
use crate::store::{self, catalog};
use crate::store::catalog::{Category, Level, Subject, Year};
use crate::store::documents::{Document, DocumentFile, DocumentStore};

/// Aggregate counts across the whole repository.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Stats {
    pub total_levels: i64,
    pub total_years: i64,
    pub total_subjects: i64,
    pub total_documents: i64,
    /// Sum of all download counters; zero when no documents exist.
    pub total_downloads: i64,
}

pub struct Repository {
    conn: Connection,
    documents: DocumentStore,
}

impl Repository {
    /// Open (creating if necessary) the repository rooted at the
    /// configured data dir: schema applied, canonical taxonomy seeded.
    pub fn open(config: &Config) -> Result<Self, AppError> {
        fs::create_dir_all(&config.data_dir).map_err(|e| {
            AppError::Storage(format!(
                "create data dir {}: {e}",
                config.data_dir.display()
            ))
        })?;

        let conn = store::open_conn(&config.db_path())?;
        store::init_schema(&conn)?;
        if seed::seed_if_empty(&conn)? {
            info!(db = %config.db_path().display(), "seeded empty catalog");
        }

        Ok(Self {
            conn,
            documents: DocumentStore::new(config.uploads_path()),
        })
    }

    // ── Public reads ──────────────────────────────────────────────────

    pub fn levels(&self) -> Result<Vec<Level>, AppError> {
        catalog::list_levels(&self.conn)
    }

    pub fn years(&self, level_id: i64) -> Result<Vec<Year>, AppError> {
        catalog::list_years(&self.conn, level_id)
    }

    pub fn subjects(&self, year_id: i64) -> Result<Vec<Subject>, AppError> {
        catalog::list_subjects(&self.conn, year_id)
    }

    pub fn categories(&self) -> Result<Vec<Category>, AppError> {
        catalog::list_categories(&self.conn)
    }

    pub fn documents_by_subject(&self, subject_id: i64) -> Result<Vec<Document>, AppError> {
        self.documents.list_by_subject(&self.conn, subject_id)
    }

    pub fn stats(&self) -> Result<Stats, AppError> {
        Ok(Stats {
            total_levels: self.count("SELECT COUNT(*) FROM levels")?,
            total_years: self.count("SELECT COUNT(*) FROM years")?,
            total_subjects: self.count("SELECT COUNT(*) FROM subjects")?,
            total_documents: self.count("SELECT COUNT(*) FROM documents")?,
            total_downloads: self.count("SELECT COALESCE(SUM(downloads), 0) FROM documents")?,
        })
    }

    /// Resolve a document's file for serving and count the download.
    /// The counter moves only after a successful resolve; an unknown id is
    /// `NotFound` and counts nothing.
    pub fn resolve_download(&self, id: i64) -> Result<DocumentFile, AppError> {
        let file = self.documents.fetch(&self.conn, id)?;
        self.documents.increment_download(&self.conn, id)?;
        Ok(file)
    }

    // ── Admin reads ───────────────────────────────────────────────────

    pub fn all_years(&self) -> Result<Vec<Year>, AppError> {
        catalog::list_all_years(&self.conn)
    }

    pub fn all_subjects(&self) -> Result<Vec<Subject>, AppError> {
        catalog::list_all_subjects(&self.conn)
    }

    pub fn all_documents(&self) -> Result<Vec<Document>, AppError> {
        self.documents.list_all(&self.conn)
    }

    // ── Admin writes: catalog ─────────────────────────────────────────

    pub fn create_level(&self, name: &str, name_ar: &str, color: &str) -> Result<Level, AppError> {
        catalog::create_level(&self.conn, name, name_ar, color)
    }

    pub fn update_level(
        &self,
        id: i64,
        name: &str,
        name_ar: &str,
        color: &str,
    ) -> Result<(), AppError> {
        catalog::update_level(&self.conn, id, name, name_ar, color)
    }

    pub fn delete_level(&self, id: i64) -> Result<(), AppError> {
        catalog::delete_level(&self.conn, id)
    }

    pub fn create_year(&self, level_id: i64, name: &str, name_ar: &str) -> Result<Year, AppError> {
        catalog::create_year(&self.conn, level_id, name, name_ar)
    }

    pub fn update_year(
        &self,
        id: i64,
        level_id: i64,
        name: &str,
        name_ar: &str,
    ) -> Result<(), AppError> {
        catalog::update_year(&self.conn, id, level_id, name, name_ar)
    }

    pub fn delete_year(&self, id: i64) -> Result<(), AppError> {
        catalog::delete_year(&self.conn, id)
    }

    pub fn create_subject(
        &self,
        year_id: i64,
        name: &str,
        name_ar: &str,
        icon: &str,
    ) -> Result<Subject, AppError> {
        catalog::create_subject(&self.conn, year_id, name, name_ar, icon)
    }

    pub fn update_subject(
        &self,
        id: i64,
        year_id: i64,
        name: &str,
        name_ar: &str,
        icon: &str,
    ) -> Result<(), AppError> {
        catalog::update_subject(&self.conn, id, year_id, name, name_ar, icon)
    }

    pub fn delete_subject(&self, id: i64) -> Result<(), AppError> {
        catalog::delete_subject(&self.conn, id)
    }

    pub fn create_category(&self, name: &str, name_ar: &str) -> Result<Category, AppError> {
        catalog::create_category(&self.conn, name, name_ar)
    }

    pub fn update_category(&self, id: i64, name: &str, name_ar: &str) -> Result<(), AppError> {
        catalog::update_category(&self.conn, id, name, name_ar)
    }

    pub fn delete_category(&self, id: i64) -> Result<(), AppError> {
        catalog::delete_category(&self.conn, id)
    }

    // ── Admin writes: documents ───────────────────────────────────────

    pub fn upload_document(
        &self,
        subject_id: i64,
        category_id: i64,
        title: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Document, AppError> {
        self.documents
            .store(&self.conn, subject_id, category_id, title, file_name, bytes)
    }

    pub fn delete_document(&self, id: i64) -> Result<(), AppError> {
        self.documents.delete(&self.conn, id)
    }

    fn count(&self, sql: &str) -> Result<i64, AppError> {
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(|e| AppError::Storage(format!("stats: {sql}: {e}")))
    }
}
