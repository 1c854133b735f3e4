//! Cartable — repository service entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at the configured level
//!   4. Open the repository (schema init + canonical seed)
//!   5. Print status

use tracing::info;

use cartable::error::AppError;
use cartable::repository::Repository;
use cartable::{config, logger};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::parse_level(&config.log_level)?;
    logger::init(&config.log_level)?;

    info!(
        service = %config.service_name,
        data_dir = %config.data_dir.display(),
        log_level = %config.log_level,
        "config loaded"
    );

    let repo = Repository::open(&config)?;
    let stats = repo.stats()?;

    info!(
        levels = stats.total_levels,
        years = stats.total_years,
        subjects = stats.total_subjects,
        documents = stats.total_documents,
        downloads = stats.total_downloads,
        "repository ready"
    );
    println!(
        "✓ Repository ready at {} ({} levels, {} subjects, {} documents)",
        config.data_dir.display(),
        stats.total_levels,
        stats.total_subjects,
        stats.total_documents
    );

    Ok(())
}
