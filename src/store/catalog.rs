//! Catalog store: CRUD for the Level → Year → Subject hierarchy and the
//! cross-cutting Category tag.
//!
//! Every operation takes the connection explicitly; nothing here owns
//! storage state. Joined listings annotate each row with its parent's
//! Arabic display name, which is what the browsing UI renders. Listings
//! join on the parent table, so a row whose parent was deleted is silently
//! omitted rather than surfaced as an error.
//!
//! Update and delete against an id that matches nothing affect zero rows
//! and report success; callers that care must check existence first.

use rusqlite::{Connection, Row, params};

use crate::error::AppError;
use crate::store::now_iso8601;

// ── Entities ──────────────────────────────────────────────────────────────────

/// A school level (e.g. Primaire), the root of the hierarchy.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Level {
    pub id: i64,
    pub name: String,
    pub name_ar: String,
    /// Display color, a `#rrggbb` hex string.
    pub color: String,
    pub created_at: String,
}

/// A school year within a level.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Year {
    pub id: i64,
    pub level_id: i64,
    pub name: String,
    pub name_ar: String,
    pub created_at: String,
    /// Parent level's Arabic name; populated by joined listings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,
}

/// A subject taught in a given year.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Subject {
    pub id: i64,
    pub year_id: i64,
    pub name: String,
    pub name_ar: String,
    /// Icon glyph shown next to the subject (may be empty).
    pub icon: String,
    pub created_at: String,
    /// Parent year's Arabic name; populated by joined listings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_name: Option<String>,
}

/// A document category (Cours, Examens, …), global rather than nested.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub name_ar: String,
    pub created_at: String,
}

fn require_names(name: &str, name_ar: &str) -> Result<(), AppError> {
    if name.trim().is_empty() || name_ar.trim().is_empty() {
        return Err(AppError::Invalid(
            "name and name_ar must not be empty".into(),
        ));
    }
    Ok(())
}

// ── Levels ────────────────────────────────────────────────────────────────────

fn map_level(row: &Row<'_>) -> rusqlite::Result<Level> {
    Ok(Level {
        id: row.get(0)?,
        name: row.get(1)?,
        name_ar: row.get(2)?,
        color: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn list_levels(conn: &Connection) -> Result<Vec<Level>, AppError> {
    let mut stmt = conn
        .prepare("SELECT id, name, name_ar, color, created_at FROM levels ORDER BY id")
        .map_err(|e| AppError::Storage(format!("catalog: prepare list levels: {e}")))?;
    let rows = stmt
        .query_map([], map_level)
        .map_err(|e| AppError::Storage(format!("catalog: query levels: {e}")))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Storage(format!("catalog: map level row: {e}")))
}

pub fn create_level(
    conn: &Connection,
    name: &str,
    name_ar: &str,
    color: &str,
) -> Result<Level, AppError> {
    require_names(name, name_ar)?;
    let created_at = now_iso8601();
    conn.execute(
        "INSERT INTO levels (name, name_ar, color, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, name_ar, color, created_at],
    )
    .map_err(|e| AppError::Storage(format!("catalog: insert level: {e}")))?;

    Ok(Level {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        name_ar: name_ar.to_string(),
        color: color.to_string(),
        created_at,
    })
}

pub fn update_level(
    conn: &Connection,
    id: i64,
    name: &str,
    name_ar: &str,
    color: &str,
) -> Result<(), AppError> {
    require_names(name, name_ar)?;
    conn.execute(
        "UPDATE levels SET name = ?1, name_ar = ?2, color = ?3 WHERE id = ?4",
        params![name, name_ar, color, id],
    )
    .map_err(|e| AppError::Storage(format!("catalog: update level {id}: {e}")))?;
    Ok(())
}

/// Deleting a level does not cascade; its years remain as orphan rows that
/// joined listings no longer return.
pub fn delete_level(conn: &Connection, id: i64) -> Result<(), AppError> {
    conn.execute("DELETE FROM levels WHERE id = ?1", params![id])
        .map_err(|e| AppError::Storage(format!("catalog: delete level {id}: {e}")))?;
    Ok(())
}

// ── Years ─────────────────────────────────────────────────────────────────────

fn map_year_joined(row: &Row<'_>) -> rusqlite::Result<Year> {
    Ok(Year {
        id: row.get(0)?,
        level_id: row.get(1)?,
        name: row.get(2)?,
        name_ar: row.get(3)?,
        created_at: row.get(4)?,
        level_name: Some(row.get(5)?),
    })
}

/// Years under `level_id`, ordered by id, annotated with the level name.
/// An unknown level id yields an empty vec, not an error.
pub fn list_years(conn: &Connection, level_id: i64) -> Result<Vec<Year>, AppError> {
    let mut stmt = conn
        .prepare(
            "SELECT y.id, y.level_id, y.name, y.name_ar, y.created_at, l.name_ar AS level_name
             FROM years y
             JOIN levels l ON y.level_id = l.id
             WHERE y.level_id = ?1
             ORDER BY y.id",
        )
        .map_err(|e| AppError::Storage(format!("catalog: prepare list years: {e}")))?;
    let rows = stmt
        .query_map(params![level_id], map_year_joined)
        .map_err(|e| AppError::Storage(format!("catalog: query years: {e}")))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Storage(format!("catalog: map year row: {e}")))
}

/// All years across levels, ordered by (level id, id) for stable admin
/// listing.
pub fn list_all_years(conn: &Connection) -> Result<Vec<Year>, AppError> {
    let mut stmt = conn
        .prepare(
            "SELECT y.id, y.level_id, y.name, y.name_ar, y.created_at, l.name_ar AS level_name
             FROM years y
             JOIN levels l ON y.level_id = l.id
             ORDER BY y.level_id, y.id",
        )
        .map_err(|e| AppError::Storage(format!("catalog: prepare list all years: {e}")))?;
    let rows = stmt
        .query_map([], map_year_joined)
        .map_err(|e| AppError::Storage(format!("catalog: query all years: {e}")))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Storage(format!("catalog: map year row: {e}")))
}

/// The level id is not checked against the levels table; a bad parent id
/// produces a row that joined listings omit.
pub fn create_year(
    conn: &Connection,
    level_id: i64,
    name: &str,
    name_ar: &str,
) -> Result<Year, AppError> {
    require_names(name, name_ar)?;
    let created_at = now_iso8601();
    conn.execute(
        "INSERT INTO years (level_id, name, name_ar, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![level_id, name, name_ar, created_at],
    )
    .map_err(|e| AppError::Storage(format!("catalog: insert year: {e}")))?;

    Ok(Year {
        id: conn.last_insert_rowid(),
        level_id,
        name: name.to_string(),
        name_ar: name_ar.to_string(),
        created_at,
        level_name: None,
    })
}

pub fn update_year(
    conn: &Connection,
    id: i64,
    level_id: i64,
    name: &str,
    name_ar: &str,
) -> Result<(), AppError> {
    require_names(name, name_ar)?;
    conn.execute(
        "UPDATE years SET level_id = ?1, name = ?2, name_ar = ?3 WHERE id = ?4",
        params![level_id, name, name_ar, id],
    )
    .map_err(|e| AppError::Storage(format!("catalog: update year {id}: {e}")))?;
    Ok(())
}

pub fn delete_year(conn: &Connection, id: i64) -> Result<(), AppError> {
    conn.execute("DELETE FROM years WHERE id = ?1", params![id])
        .map_err(|e| AppError::Storage(format!("catalog: delete year {id}: {e}")))?;
    Ok(())
}

// ── Subjects ──────────────────────────────────────────────────────────────────

fn map_subject_joined(row: &Row<'_>) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        year_id: row.get(1)?,
        name: row.get(2)?,
        name_ar: row.get(3)?,
        icon: row.get(4)?,
        created_at: row.get(5)?,
        year_name: Some(row.get(6)?),
    })
}

/// Subjects under `year_id`, ordered by id, annotated with the year name.
pub fn list_subjects(conn: &Connection, year_id: i64) -> Result<Vec<Subject>, AppError> {
    let mut stmt = conn
        .prepare(
            "SELECT s.id, s.year_id, s.name, s.name_ar, s.icon, s.created_at, y.name_ar AS year_name
             FROM subjects s
             JOIN years y ON s.year_id = y.id
             WHERE s.year_id = ?1
             ORDER BY s.id",
        )
        .map_err(|e| AppError::Storage(format!("catalog: prepare list subjects: {e}")))?;
    let rows = stmt
        .query_map(params![year_id], map_subject_joined)
        .map_err(|e| AppError::Storage(format!("catalog: query subjects: {e}")))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Storage(format!("catalog: map subject row: {e}")))
}

pub fn list_all_subjects(conn: &Connection) -> Result<Vec<Subject>, AppError> {
    let mut stmt = conn
        .prepare(
            "SELECT s.id, s.year_id, s.name, s.name_ar, s.icon, s.created_at, y.name_ar AS year_name
             FROM subjects s
             JOIN years y ON s.year_id = y.id
             ORDER BY s.year_id, s.id",
        )
        .map_err(|e| AppError::Storage(format!("catalog: prepare list all subjects: {e}")))?;
    let rows = stmt
        .query_map([], map_subject_joined)
        .map_err(|e| AppError::Storage(format!("catalog: query all subjects: {e}")))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Storage(format!("catalog: map subject row: {e}")))
}

pub fn create_subject(
    conn: &Connection,
    year_id: i64,
    name: &str,
    name_ar: &str,
    icon: &str,
) -> Result<Subject, AppError> {
    require_names(name, name_ar)?;
    let created_at = now_iso8601();
    conn.execute(
        "INSERT INTO subjects (year_id, name, name_ar, icon, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![year_id, name, name_ar, icon, created_at],
    )
    .map_err(|e| AppError::Storage(format!("catalog: insert subject: {e}")))?;

    Ok(Subject {
        id: conn.last_insert_rowid(),
        year_id,
        name: name.to_string(),
        name_ar: name_ar.to_string(),
        icon: icon.to_string(),
        created_at,
        year_name: None,
    })
}

pub fn update_subject(
    conn: &Connection,
    id: i64,
    year_id: i64,
    name: &str,
    name_ar: &str,
    icon: &str,
) -> Result<(), AppError> {
    require_names(name, name_ar)?;
    conn.execute(
        "UPDATE subjects SET year_id = ?1, name = ?2, name_ar = ?3, icon = ?4 WHERE id = ?5",
        params![year_id, name, name_ar, icon, id],
    )
    .map_err(|e| AppError::Storage(format!("catalog: update subject {id}: {e}")))?;
    Ok(())
}

pub fn delete_subject(conn: &Connection, id: i64) -> Result<(), AppError> {
    conn.execute("DELETE FROM subjects WHERE id = ?1", params![id])
        .map_err(|e| AppError::Storage(format!("catalog: delete subject {id}: {e}")))?;
    Ok(())
}

// ── Categories ────────────────────────────────────────────────────────────────

fn map_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        name_ar: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>, AppError> {
    let mut stmt = conn
        .prepare("SELECT id, name, name_ar, created_at FROM categories ORDER BY id")
        .map_err(|e| AppError::Storage(format!("catalog: prepare list categories: {e}")))?;
    let rows = stmt
        .query_map([], map_category)
        .map_err(|e| AppError::Storage(format!("catalog: query categories: {e}")))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Storage(format!("catalog: map category row: {e}")))
}

pub fn create_category(
    conn: &Connection,
    name: &str,
    name_ar: &str,
) -> Result<Category, AppError> {
    require_names(name, name_ar)?;
    let created_at = now_iso8601();
    conn.execute(
        "INSERT INTO categories (name, name_ar, created_at) VALUES (?1, ?2, ?3)",
        params![name, name_ar, created_at],
    )
    .map_err(|e| AppError::Storage(format!("catalog: insert category: {e}")))?;

    Ok(Category {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        name_ar: name_ar.to_string(),
        created_at,
    })
}

pub fn update_category(
    conn: &Connection,
    id: i64,
    name: &str,
    name_ar: &str,
) -> Result<(), AppError> {
    require_names(name, name_ar)?;
    conn.execute(
        "UPDATE categories SET name = ?1, name_ar = ?2 WHERE id = ?3",
        params![name, name_ar, id],
    )
    .map_err(|e| AppError::Storage(format!("catalog: update category {id}: {e}")))?;
    Ok(())
}

pub fn delete_category(conn: &Connection, id: i64) -> Result<(), AppError> {
    conn.execute("DELETE FROM categories WHERE id = ?1", params![id])
        .map_err(|e| AppError::Storage(format!("catalog: delete category {id}: {e}")))?;
    Ok(())
}
