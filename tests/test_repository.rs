//! Integration tests for the repository facade: seeding, stats, and the
//! upload/download flow as the API layer drives it.
//!
//! Run with:
//!   cargo test --test test_repository

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use cartable::config::{Config, StorageConfig};
use cartable::repository::Repository;

// ── helpers ──────────────────────────────────────────────────────────────────

fn test_config(dir: &Path) -> Config {
    Config {
        service_name: "cartable-test".into(),
        data_dir: dir.to_path_buf(),
        log_level: "info".into(),
        storage: StorageConfig {
            db_file: "cartable.db".into(),
            uploads_dir: "uploads".into(),
        },
    }
}

fn open_repo() -> (TempDir, Repository) {
    let tmp = TempDir::new().expect("tempdir");
    let repo = Repository::open(&test_config(tmp.path())).expect("open repository");
    (tmp, repo)
}

// ── bootstrap ─────────────────────────────────────────────────────────────────

#[test]
fn open_creates_database_and_seeds_taxonomy() {
    let (tmp, repo) = open_repo();
    assert!(tmp.path().join("cartable.db").exists());

    let levels = repo.levels().unwrap();
    assert_eq!(levels.len(), 4);
    assert_eq!(levels[0].name, "Primaire");
    assert_eq!(levels[3].name, "Université");

    assert_eq!(repo.categories().unwrap().len(), 5);
    assert_eq!(repo.all_years().unwrap().len(), 12);
    assert_eq!(repo.all_subjects().unwrap().len(), 217);
}

#[test]
fn reopening_leaves_seeded_counts_unchanged() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());

    drop(Repository::open(&config).unwrap());
    let repo = Repository::open(&config).unwrap();

    let stats = repo.stats().unwrap();
    assert_eq!(stats.total_levels, 4);
    assert_eq!(stats.total_years, 12);
    assert_eq!(stats.total_subjects, 217);
}

#[test]
fn seeded_years_are_annotated_with_level_names() {
    let (_tmp, repo) = open_repo();
    let levels = repo.levels().unwrap();
    let years = repo.years(levels[0].id).unwrap();
    assert_eq!(years.len(), 5);
    assert!(years.iter().all(|y| y.level_name.is_some()));

    let subjects = repo.subjects(years[0].id).unwrap();
    assert_eq!(subjects.len(), 16);
    assert!(subjects.iter().all(|s| s.year_name.is_some()));
}

// ── catalog administration ────────────────────────────────────────────────────

#[test]
fn catalog_crud_flows_through_the_facade() {
    let (_tmp, repo) = open_repo();

    let level = repo.create_level("Formation", "تكوين", "#8b5cf6").unwrap();
    assert!(repo.levels().unwrap().iter().any(|l| l.id == level.id));

    repo.update_level(level.id, "Formation Pro", "تكوين مهني", "#8b5cf6")
        .unwrap();
    let updated = repo
        .levels()
        .unwrap()
        .into_iter()
        .find(|l| l.id == level.id)
        .unwrap();
    assert_eq!(updated.name, "Formation Pro");

    let year = repo.create_year(level.id, "Année 1", "السنة الأولى").unwrap();
    assert_eq!(repo.years(level.id).unwrap().len(), 1);

    repo.delete_year(year.id).unwrap();
    repo.delete_level(level.id).unwrap();
    assert!(!repo.levels().unwrap().iter().any(|l| l.id == level.id));
}

#[test]
fn invalid_catalog_input_is_a_client_error() {
    let (_tmp, repo) = open_repo();
    let err = repo.create_category("", "دروس").unwrap_err();
    assert!(err.is_client_error());
}

// ── documents end to end ──────────────────────────────────────────────────────

#[test]
fn upload_then_download_roundtrip() {
    let (tmp, repo) = open_repo();
    let payload = b"0123456789";

    let doc = repo
        .upload_document(5, 2, "Test", "test.pdf", payload)
        .unwrap();
    assert_eq!(doc.file_size, 10);
    assert_eq!(doc.downloads, 0);
    assert!(tmp.path().join("uploads").is_dir());

    let file = repo.resolve_download(doc.id).unwrap();
    assert_eq!(file.file_name, "test.pdf");
    assert_eq!(fs::read(&file.path).unwrap(), payload);

    let listed = repo.documents_by_subject(5).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].downloads, 1);
    assert!(listed[0].subject_name.is_some());
    assert!(listed[0].category_name.is_some());
}

#[test]
fn stats_track_uploads_downloads_and_deletes() {
    let (_tmp, repo) = open_repo();
    assert_eq!(repo.stats().unwrap().total_downloads, 0);

    let a = repo.upload_document(5, 1, "A", "a.pdf", b"aa").unwrap();
    let b = repo.upload_document(6, 2, "B", "b.pdf", b"bbb").unwrap();

    repo.resolve_download(a.id).unwrap();
    repo.resolve_download(a.id).unwrap();
    repo.resolve_download(b.id).unwrap();

    let stats = repo.stats().unwrap();
    assert_eq!(stats.total_documents, 2);
    assert_eq!(stats.total_downloads, 3);

    repo.delete_document(a.id).unwrap();
    let stats = repo.stats().unwrap();
    assert_eq!(stats.total_documents, 1);
    // Deleting a document forgets its download count as well.
    assert_eq!(stats.total_downloads, 1);
}

#[test]
fn deleted_document_resolves_to_not_found() {
    let (_tmp, repo) = open_repo();
    let doc = repo.upload_document(5, 2, "Gone", "gone.pdf", b"x").unwrap();
    let path = doc.file_path.clone();

    repo.delete_document(doc.id).unwrap();

    let err = repo.resolve_download(doc.id).unwrap_err();
    assert!(err.is_client_error());
    assert!(!Path::new(&path).exists());
}

#[test]
fn admin_document_listing_spans_subjects() {
    let (_tmp, repo) = open_repo();
    repo.upload_document(5, 1, "A", "a.pdf", b"a").unwrap();
    repo.upload_document(20, 2, "B", "b.pdf", b"b").unwrap();

    let all = repo.all_documents().unwrap();
    assert_eq!(all.len(), 2);
    // Newest first.
    assert_eq!(all[0].title, "B");
}
