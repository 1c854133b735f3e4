//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `CARTABLE_DATA_DIR` and `CARTABLE_LOG_LEVEL` env overrides.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

/// Storage layout configuration, relative to the data dir.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// SQLite database file name.
    pub db_file: String,
    /// Directory holding uploaded document files.
    pub uploads_dir: String,
}

/// Fully-resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_name: String,
    /// Directory for all persistent data (already expanded, no `~`).
    pub data_dir: PathBuf,
    pub log_level: String,
    pub storage: StorageConfig,
}

impl Config {
    /// Absolute path of the SQLite database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.db_file)
    }

    /// Absolute path of the uploads directory.
    pub fn uploads_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.uploads_dir)
    }
}

/// Raw TOML shape, the `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    service: RawService,
    #[serde(default)]
    storage: RawStorage,
}

#[derive(Deserialize)]
struct RawService {
    name: String,
    data_dir: String,
    log_level: String,
}

#[derive(Deserialize)]
struct RawStorage {
    #[serde(default = "default_db_file")]
    db_file: String,
    #[serde(default = "default_uploads_dir")]
    uploads_dir: String,
}

impl Default for RawStorage {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

fn default_db_file() -> String {
    "cartable.db".to_string()
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let data_dir_override = env::var("CARTABLE_DATA_DIR").ok();
    let log_level_override = env::var("CARTABLE_LOG_LEVEL").ok();
    load_from(
        Path::new("config/default.toml"),
        data_dir_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader accepting an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    data_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let s = parsed.service;

    let data_dir_str = data_dir_override.unwrap_or(&s.data_dir).to_string();
    let data_dir = expand_home(&data_dir_str);
    let log_level = log_level_override.unwrap_or(&s.log_level).to_string();

    Ok(Config {
        service_name: s.name,
        data_dir,
        log_level,
        storage: StorageConfig {
            db_file: parsed.storage.db_file,
            uploads_dir: parsed.storage.uploads_dir,
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// `Config` rooted at a scratch directory for unit tests.
#[cfg(test)]
impl Config {
    pub fn test_default(data_dir: &Path) -> Self {
        Self {
            service_name: "cartable-test".into(),
            data_dir: data_dir.to_path_buf(),
            log_level: "info".into(),
            storage: StorageConfig {
                db_file: default_db_file(),
                uploads_dir: default_uploads_dir(),
            },
        }
    }
}
