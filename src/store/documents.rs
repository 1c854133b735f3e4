//! Document store: metadata rows bound to files under the uploads
//! directory, plus the download counter.
//!
//! A document row and its file are created together and deleted together,
//! but never inside one transaction. The failure windows are deliberate:
//! a metadata insert that fails after the file was written leaves the file
//! behind, and a file removal that fails after the row was deleted leaves
//! the file behind too. Rows are authoritative; stray files under the
//! uploads directory are an operator concern.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, Row, params};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::now_iso8601;

/// A stored document, as returned by listings and upload.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Document {
    pub id: i64,
    pub subject_id: i64,
    pub category_id: i64,
    pub title: String,
    /// Original file name, used as the download display name.
    pub file_name: String,
    /// Path of the stored file under the uploads directory.
    pub file_path: String,
    pub file_size: i64,
    pub downloads: i64,
    pub created_at: String,
    /// Subject's Arabic name; populated by joined listings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
    /// Category's Arabic name; populated by joined listings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

/// Resolved file reference for serving a download.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub path: PathBuf,
    /// Display name to serve the file under (the original upload name).
    pub file_name: String,
}

/// File lifecycle and metadata operations for uploaded documents.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    uploads_dir: PathBuf,
}

const DOCUMENT_JOIN: &str = "SELECT d.id, d.subject_id, d.category_id, d.title, d.file_name,
            d.file_path, d.file_size, d.downloads, d.created_at,
            s.name_ar AS subject_name, c.name_ar AS category_name
     FROM documents d
     JOIN subjects s ON s.id = d.subject_id
     JOIN categories c ON c.id = d.category_id";

fn map_document_joined(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        category_id: row.get(2)?,
        title: row.get(3)?,
        file_name: row.get(4)?,
        file_path: row.get(5)?,
        file_size: row.get(6)?,
        downloads: row.get(7)?,
        created_at: row.get(8)?,
        subject_name: Some(row.get(9)?),
        category_name: Some(row.get(10)?),
    })
}

impl DocumentStore {
    pub fn new(uploads_dir: PathBuf) -> Self {
        Self { uploads_dir }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Documents under `subject_id`, newest first, annotated with subject
    /// and category names.
    pub fn list_by_subject(
        &self,
        conn: &Connection,
        subject_id: i64,
    ) -> Result<Vec<Document>, AppError> {
        let sql = format!(
            "{DOCUMENT_JOIN}
             WHERE d.subject_id = ?1
             ORDER BY d.created_at DESC, d.id DESC"
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| AppError::Storage(format!("documents: prepare list by subject: {e}")))?;
        let rows = stmt
            .query_map(params![subject_id], map_document_joined)
            .map_err(|e| AppError::Storage(format!("documents: query list by subject: {e}")))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Storage(format!("documents: map document row: {e}")))
    }

    /// All documents, newest first, for the admin listing.
    pub fn list_all(&self, conn: &Connection) -> Result<Vec<Document>, AppError> {
        let sql = format!("{DOCUMENT_JOIN} ORDER BY d.created_at DESC, d.id DESC");
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| AppError::Storage(format!("documents: prepare list all: {e}")))?;
        let rows = stmt
            .query_map([], map_document_joined)
            .map_err(|e| AppError::Storage(format!("documents: query list all: {e}")))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Storage(format!("documents: map document row: {e}")))
    }

    /// Persist `bytes` under the uploads directory and insert the metadata
    /// row, with the download counter starting at zero.
    ///
    /// The stored name is `{token}_{base name}` where the token is a
    /// UUIDv7, so two uploads of identically-named files never collide on
    /// disk. The row records the original name for serving.
    pub fn store(
        &self,
        conn: &Connection,
        subject_id: i64,
        category_id: i64,
        title: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Document, AppError> {
        fs::create_dir_all(&self.uploads_dir).map_err(|e| {
            AppError::Storage(format!(
                "documents: create {}: {e}",
                self.uploads_dir.display()
            ))
        })?;

        let base = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");
        let stored_name = format!("{}_{base}", Uuid::now_v7());
        let path = self.uploads_dir.join(&stored_name);
        fs::write(&path, bytes)
            .map_err(|e| AppError::Storage(format!("documents: write {}: {e}", path.display())))?;

        let path_str = path.to_string_lossy().into_owned();
        let created_at = now_iso8601();
        // A failed insert leaves the written file behind; it is never
        // rolled back.
        conn.execute(
            "INSERT INTO documents
                 (subject_id, category_id, title, file_name, file_path, file_size, downloads, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
            params![
                subject_id,
                category_id,
                title,
                file_name,
                path_str,
                bytes.len() as i64,
                created_at
            ],
        )
        .map_err(|e| AppError::Storage(format!("documents: insert metadata: {e}")))?;

        Ok(Document {
            id: conn.last_insert_rowid(),
            subject_id,
            category_id,
            title: title.to_string(),
            file_name: file_name.to_string(),
            file_path: path_str,
            file_size: bytes.len() as i64,
            downloads: 0,
            created_at,
            subject_name: None,
            category_name: None,
        })
    }

    /// Resolve the stored path and display name for a download.
    pub fn fetch(&self, conn: &Connection, id: i64) -> Result<DocumentFile, AppError> {
        let result = conn.query_row(
            "SELECT file_path, file_name FROM documents WHERE id = ?1",
            params![id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        );
        match result {
            Ok((path, file_name)) => Ok(DocumentFile {
                path: PathBuf::from(path),
                file_name,
            }),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(AppError::NotFound(format!("document {id}")))
            }
            Err(e) => Err(AppError::Storage(format!("documents: fetch {id}: {e}"))),
        }
    }

    /// Add one to the download counter, server-side, so concurrent
    /// downloads never lose an increment. Unknown ids are a silent no-op.
    pub fn increment_download(&self, conn: &Connection, id: i64) -> Result<(), AppError> {
        conn.execute(
            "UPDATE documents SET downloads = downloads + 1 WHERE id = ?1",
            params![id],
        )
        .map_err(|e| AppError::Storage(format!("documents: increment downloads for {id}: {e}")))?;
        Ok(())
    }

    /// Delete the metadata row, then best-effort remove the stored file.
    /// Row deletion is the success criterion; a failed file removal is
    /// logged and swallowed.
    pub fn delete(&self, conn: &Connection, id: i64) -> Result<(), AppError> {
        let path: Option<String> = conn
            .query_row(
                "SELECT file_path FROM documents WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .ok();

        conn.execute("DELETE FROM documents WHERE id = ?1", params![id])
            .map_err(|e| AppError::Storage(format!("documents: delete {id}: {e}")))?;

        if let Some(path) = path.filter(|p| !p.is_empty()) {
            if let Err(e) = fs::remove_file(&path) {
                warn!(document_id = id, path = %path, error = %e, "could not remove stored file");
            }
        }
        Ok(())
    }
}
