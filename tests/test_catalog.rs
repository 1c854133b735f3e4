//! Integration tests for the catalog store.
//!
//! Run with:
//!   cargo test --test test_catalog

use rusqlite::Connection;
use tempfile::TempDir;

use cartable::store::{catalog, init_schema, open_conn};

// ── helpers ──────────────────────────────────────────────────────────────────

fn empty_db() -> (TempDir, Connection) {
    let tmp = TempDir::new().expect("tempdir");
    let conn = open_conn(&tmp.path().join("catalog.db")).expect("open db");
    init_schema(&conn).expect("init schema");
    (tmp, conn)
}

// ── hierarchy scenario ────────────────────────────────────────────────────────

#[test]
fn first_level_and_year_get_id_one() {
    let (_tmp, conn) = empty_db();

    let level = catalog::create_level(&conn, "Primaire", "التعليم الابتدائي", "#ef4444").unwrap();
    assert_eq!(level.id, 1);

    let year = catalog::create_year(&conn, level.id, "Année 1", "السنة الأولى ابتدائي").unwrap();
    assert_eq!(year.id, 1);

    let years = catalog::list_years(&conn, 1).unwrap();
    assert_eq!(years.len(), 1);
    assert_eq!(years[0].level_id, 1);
    assert_eq!(years[0].level_name.as_deref(), Some("التعليم الابتدائي"));
}

#[test]
fn listing_years_of_unknown_level_is_empty_not_an_error() {
    let (_tmp, conn) = empty_db();
    catalog::create_level(&conn, "Primaire", "ابتدائي", "#ef4444").unwrap();
    assert!(catalog::list_years(&conn, 999).unwrap().is_empty());
}

#[test]
fn years_only_match_their_level_and_come_back_ordered() {
    let (_tmp, conn) = empty_db();
    let a = catalog::create_level(&conn, "Primaire", "ابتدائي", "#ef4444").unwrap();
    let b = catalog::create_level(&conn, "Moyen", "متوسط", "#10b981").unwrap();

    catalog::create_year(&conn, b.id, "Année 1 moyen", "السنة الأولى متوسط").unwrap();
    catalog::create_year(&conn, a.id, "Année 1 primaire", "السنة الأولى ابتدائي").unwrap();
    catalog::create_year(&conn, a.id, "Année 2 primaire", "السنة الثانية ابتدائي").unwrap();

    let years = catalog::list_years(&conn, a.id).unwrap();
    assert_eq!(years.len(), 2);
    assert!(years.iter().all(|y| y.level_id == a.id));
    let ids: Vec<i64> = years.iter().map(|y| y.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn admin_listing_orders_by_parent_then_id() {
    let (_tmp, conn) = empty_db();
    let a = catalog::create_level(&conn, "Primaire", "ابتدائي", "#ef4444").unwrap();
    let b = catalog::create_level(&conn, "Moyen", "متوسط", "#10b981").unwrap();
    catalog::create_year(&conn, b.id, "Année 1 moyen", "السنة الأولى متوسط").unwrap();
    catalog::create_year(&conn, a.id, "Année 1 primaire", "السنة الأولى ابتدائي").unwrap();

    let all = catalog::list_all_years(&conn).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].level_id, a.id);
    assert_eq!(all[1].level_id, b.id);
}

// ── permissive mutations ──────────────────────────────────────────────────────

#[test]
fn mutating_missing_rows_reports_success() {
    let (_tmp, conn) = empty_db();
    catalog::update_year(&conn, 123, 1, "Année", "السنة").unwrap();
    catalog::delete_year(&conn, 123).unwrap();
    catalog::update_subject(&conn, 123, 1, "Maths", "الرياضيات", "📐").unwrap();
    catalog::delete_category(&conn, 123).unwrap();
}

#[test]
fn deleting_a_parent_hides_children_from_joined_listings() {
    let (_tmp, conn) = empty_db();
    let level = catalog::create_level(&conn, "Primaire", "ابتدائي", "#ef4444").unwrap();
    let year = catalog::create_year(&conn, level.id, "Année 1", "السنة الأولى").unwrap();
    catalog::create_subject(&conn, year.id, "Maths", "الرياضيات", "📐").unwrap();

    catalog::delete_year(&conn, year.id).unwrap();

    // The subject row survives unlinked and stops appearing in listings.
    assert!(catalog::list_subjects(&conn, year.id).unwrap().is_empty());
    assert!(catalog::list_all_subjects(&conn).unwrap().is_empty());
}

#[test]
fn empty_names_are_rejected_across_entities() {
    let (_tmp, conn) = empty_db();
    assert!(catalog::create_level(&conn, "", "س", "#fff").is_err());
    assert!(catalog::create_year(&conn, 1, "Année", "").is_err());
    assert!(catalog::create_subject(&conn, 1, " ", "س", "").is_err());
    assert!(catalog::create_category(&conn, "Cours", " ").is_err());
}

// ── categories ────────────────────────────────────────────────────────────────

#[test]
fn categories_list_in_id_order() {
    let (_tmp, conn) = empty_db();
    catalog::create_category(&conn, "Cours", "دروس").unwrap();
    catalog::create_category(&conn, "Examens", "اختبارات").unwrap();
    catalog::create_category(&conn, "Exercices", "تمارين").unwrap();

    let cats = catalog::list_categories(&conn).unwrap();
    let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Cours", "Examens", "Exercices"]);
}
